//! Query seam and lookup strategies
//!
//! Platforms implement [`AppQuery`]; everything above it (strategy choice,
//! fallback, timeout) lives here so it can be exercised with fakes.

use crate::{ActiveApp, RunningApp};
use std::str::FromStr;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("No active application")]
    NoActiveApplication,
    #[error("Failed to get active app: {0}")]
    Platform(String),
    #[error("Listing running applications is not supported on this platform")]
    EnumerationUnsupported,
    #[error("Unsupported platform")]
    Unsupported,
    #[error("Active application query timed out after {0:?}")]
    TimedOut(Duration),
    #[error("Query worker exited without a result")]
    WorkerLost,
}

pub type Result<T> = std::result::Result<T, QueryError>;

/// Access to the host's application-management service
pub trait AppQuery: Send {
    /// The application currently holding input focus, if any
    fn frontmost_app(&self) -> Result<Option<ActiveApp>>;

    /// Every running user application with its focus state
    fn running_apps(&self) -> Result<Vec<RunningApp>> {
        Err(QueryError::EnumerationUnsupported)
    }
}

impl<Q: AppQuery + ?Sized> AppQuery for Box<Q> {
    fn frontmost_app(&self) -> Result<Option<ActiveApp>> {
        (**self).frontmost_app()
    }

    fn running_apps(&self) -> Result<Vec<RunningApp>> {
        (**self).running_apps()
    }
}

/// How the active application is located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Direct frontmost query, falling back to a listing when it comes back empty
    #[default]
    Auto,
    /// Direct frontmost query only
    Frontmost,
    /// Scan running applications for the active one
    Enumerate,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Strategy::Auto),
            "frontmost" => Ok(Strategy::Frontmost),
            "enumerate" => Ok(Strategy::Enumerate),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

/// Locate the active application with the given strategy
pub fn lookup<Q: AppQuery + ?Sized>(query: &Q, strategy: Strategy) -> Result<ActiveApp> {
    match strategy {
        Strategy::Frontmost => query
            .frontmost_app()?
            .ok_or(QueryError::NoActiveApplication),
        Strategy::Enumerate => scan(query),
        Strategy::Auto => {
            if let Some(app) = query.frontmost_app()? {
                return Ok(app);
            }

            debug!("direct query found no application, scanning running applications");
            match scan(query) {
                Err(QueryError::EnumerationUnsupported) => Err(QueryError::NoActiveApplication),
                other => other,
            }
        }
    }
}

fn scan<Q: AppQuery + ?Sized>(query: &Q) -> Result<ActiveApp> {
    let apps = query.running_apps()?;
    debug!(count = apps.len(), "listed running applications");

    apps.into_iter()
        .find(|entry| entry.active)
        .map(|entry| entry.app)
        .ok_or(QueryError::NoActiveApplication)
}

/// Run [`lookup`] on a worker thread and give up after `timeout`.
///
/// `None` runs the lookup inline on the calling thread.
pub fn lookup_with_timeout<Q>(query: Q, strategy: Strategy, timeout: Option<Duration>) -> Result<ActiveApp>
where
    Q: AppQuery + 'static,
{
    let Some(timeout) = timeout else {
        return lookup(&query, strategy);
    };

    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("frontmost-query".to_string())
        .spawn(move || {
            // Receiver is gone once the caller timed out
            let _ = tx.send(lookup(&query, strategy));
        })
        .map_err(|e| QueryError::Platform(format!("Failed to spawn query thread: {}", e)))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            warn!(?timeout, "active application query did not return");
            Err(QueryError::TimedOut(timeout))
        }
        Err(RecvTimeoutError::Disconnected) => Err(QueryError::WorkerLost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn app(name: &str) -> ActiveApp {
        ActiveApp::new(
            Some(name.to_string()),
            Some(format!("com.example.{}", name.to_lowercase())),
            Some(PathBuf::from(format!("/Applications/{}.app", name))),
        )
    }

    struct FrontmostOnly(Option<ActiveApp>);

    impl AppQuery for FrontmostOnly {
        fn frontmost_app(&self) -> Result<Option<ActiveApp>> {
            Ok(self.0.clone())
        }
    }

    struct Listing {
        frontmost: Option<ActiveApp>,
        running: Vec<RunningApp>,
    }

    impl AppQuery for Listing {
        fn frontmost_app(&self) -> Result<Option<ActiveApp>> {
            Ok(self.frontmost.clone())
        }

        fn running_apps(&self) -> Result<Vec<RunningApp>> {
            Ok(self.running.clone())
        }
    }

    struct Broken;

    impl AppQuery for Broken {
        fn frontmost_app(&self) -> Result<Option<ActiveApp>> {
            Err(QueryError::Platform("X11 connection failed".to_string()))
        }

        fn running_apps(&self) -> Result<Vec<RunningApp>> {
            panic!("fallback must not run after a platform error");
        }
    }

    struct Stalled;

    impl AppQuery for Stalled {
        fn frontmost_app(&self) -> Result<Option<ActiveApp>> {
            thread::sleep(Duration::from_secs(2));
            Ok(None)
        }
    }

    struct Panicking;

    impl AppQuery for Panicking {
        fn frontmost_app(&self) -> Result<Option<ActiveApp>> {
            panic!("native call aborted");
        }
    }

    fn listing() -> Listing {
        Listing {
            frontmost: None,
            running: vec![
                RunningApp::new(app("Dock"), false),
                RunningApp::new(app("Terminal"), true),
                RunningApp::new(app("Safari"), false),
            ],
        }
    }

    #[test]
    fn test_frontmost_strategy() {
        let query = FrontmostOnly(Some(app("Safari")));
        assert_eq!(lookup(&query, Strategy::Frontmost).unwrap(), app("Safari"));

        let empty = FrontmostOnly(None);
        assert!(matches!(
            lookup(&empty, Strategy::Frontmost),
            Err(QueryError::NoActiveApplication)
        ));
    }

    #[test]
    fn test_enumerate_picks_active_entry() {
        assert_eq!(lookup(&listing(), Strategy::Enumerate).unwrap(), app("Terminal"));
    }

    #[test]
    fn test_enumerate_without_active_entry() {
        let mut query = listing();
        query.running.retain(|entry| !entry.active);

        assert!(matches!(
            lookup(&query, Strategy::Enumerate),
            Err(QueryError::NoActiveApplication)
        ));
    }

    #[test]
    fn test_enumerate_unsupported() {
        let query = FrontmostOnly(Some(app("Safari")));
        assert!(matches!(
            lookup(&query, Strategy::Enumerate),
            Err(QueryError::EnumerationUnsupported)
        ));
    }

    #[test]
    fn test_auto_prefers_direct_query() {
        let mut query = listing();
        query.frontmost = Some(app("Mail"));

        assert_eq!(lookup(&query, Strategy::Auto).unwrap(), app("Mail"));
    }

    #[test]
    fn test_auto_falls_back_to_listing() {
        assert_eq!(lookup(&listing(), Strategy::Auto).unwrap(), app("Terminal"));
    }

    #[test]
    fn test_auto_without_listing_support() {
        assert!(matches!(
            lookup(&FrontmostOnly(None), Strategy::Auto),
            Err(QueryError::NoActiveApplication)
        ));
    }

    #[test]
    fn test_auto_keeps_platform_errors() {
        assert!(matches!(
            lookup(&Broken, Strategy::Auto),
            Err(QueryError::Platform(_))
        ));
    }

    #[test]
    fn test_timeout_returns_result() {
        let result = lookup_with_timeout(
            FrontmostOnly(Some(app("Safari"))),
            Strategy::Auto,
            Some(Duration::from_secs(5)),
        );
        assert_eq!(result.unwrap(), app("Safari"));
    }

    #[test]
    fn test_timeout_expires() {
        let result = lookup_with_timeout(Stalled, Strategy::Frontmost, Some(Duration::from_millis(50)));
        assert!(matches!(result, Err(QueryError::TimedOut(_))));
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let result = lookup_with_timeout(Panicking, Strategy::Frontmost, Some(Duration::from_secs(5)));
        assert!(matches!(result, Err(QueryError::WorkerLost)));
    }

    #[test]
    fn test_boxed_query() {
        let query: Box<dyn AppQuery> = Box::new(listing());
        assert_eq!(lookup_with_timeout(query, Strategy::Auto, None).unwrap(), app("Terminal"));
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("auto".parse::<Strategy>().unwrap(), Strategy::Auto);
        assert_eq!("Frontmost".parse::<Strategy>().unwrap(), Strategy::Frontmost);
        assert_eq!("enumerate".parse::<Strategy>().unwrap(), Strategy::Enumerate);
        assert!("applescript".parse::<Strategy>().is_err());
    }
}
