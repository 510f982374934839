use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

/// Only web links leave the app; anything else could run a local handler.
pub fn outbound_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("Invalid job URL: {}", raw))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(anyhow!("Refusing to open '{}' link: {}", other, raw)),
    }
}

/// Open `raw` in the user's browser as a separate process.
///
/// The child gets null stdio, so it has no handle back into the terminal
/// session. The URL is passed as a single argument, never through a shell.
pub fn open_detached(raw: &str) -> Result<()> {
    let url = outbound_url(raw)?;

    launch(opener(url.as_str()))
        .with_context(|| format!("Failed to launch a browser for {}", url))?;

    tracing::info!(url = %url, "opened job link");
    Ok(())
}

/// Spawn `cmd` and reap it on a background thread so no zombie is left behind.
fn launch(mut cmd: Command) -> std::io::Result<JoinHandle<std::io::Result<ExitStatus>>> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    Ok(thread::spawn(move || {
        let status = child.wait();
        if let Err(err) = &status {
            tracing::warn!(error = %err, "could not reap browser launcher");
        }
        status
    }))
}

#[cfg(target_os = "macos")]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("rundll32");
    cmd.args(["url.dll,FileProtocolHandler", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_url_accepts_web_links() {
        assert_eq!(
            outbound_url("https://x.test/1").unwrap().as_str(),
            "https://x.test/1"
        );
        assert!(outbound_url(" http://jobs.example.com/view?id=3 ").is_ok());
    }

    #[test]
    fn test_outbound_url_refuses_other_schemes() {
        assert!(outbound_url("file:///etc/passwd").is_err());
        assert!(outbound_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_outbound_url_refuses_garbage() {
        assert!(outbound_url("").is_err());
        assert!(outbound_url("/relative/path").is_err());
    }

    #[test]
    fn test_open_detached_checks_url_first() {
        let err = open_detached("ftp://x.test/1").unwrap_err();
        assert!(err.to_string().contains("Refusing"));
    }

    #[test]
    fn test_outbound_url_keeps_query_separators() {
        let url = outbound_url("https://x.test/?a=1&b=2").unwrap();
        assert_eq!(url.as_str(), "https://x.test/?a=1&b=2");
    }

    #[test]
    fn test_opener_never_goes_through_a_shell() {
        let url = "https://x.test/?&calc";
        let cmd = opener(url);
        let program = cmd.get_program().to_string_lossy().to_lowercase();
        assert!(!["cmd", "cmd.exe", "sh", "bash"].contains(&program.as_str()));

        let args: Vec<_> = cmd.get_args().filter_map(|a| a.to_str()).collect();
        assert_eq!(args.last(), Some(&url));
        assert_eq!(args.iter().filter(|a| a.contains("calc")).count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_reaps_the_child() {
        let reaper = launch(Command::new("true")).unwrap();
        let status = reaper.join().unwrap().unwrap();
        assert!(status.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_reports_missing_program() {
        assert!(launch(Command::new("radar-no-such-opener")).is_err());
    }

    #[test]
    fn test_opener_passes_url_as_argument() {
        let cmd = opener("https://x.test/1");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args.last().and_then(|a| a.to_str()), Some("https://x.test/1"));
    }
}
