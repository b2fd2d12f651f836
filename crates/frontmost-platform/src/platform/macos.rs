//! macOS-specific active app detection using Cocoa/AppKit

use cocoa::base::{id, nil, BOOL, NO};
use cocoa::foundation::{NSAutoreleasePool, NSUInteger};
use frontmost_core::{ActiveApp, QueryError, RunningApp};
use objc::{class, msg_send, sel, sel_impl};
use std::path::PathBuf;
use tracing::debug;

pub fn frontmost_app() -> Result<Option<ActiveApp>, QueryError> {
    with_pool(|| unsafe {
        let workspace = shared_workspace()?;

        let frontmost: id = msg_send![workspace, frontmostApplication];
        if frontmost == nil {
            debug!("NSWorkspace reported no frontmost application");
            return Ok(None);
        }

        Ok(Some(app_info(frontmost)))
    })
}

pub fn running_apps() -> Result<Vec<RunningApp>, QueryError> {
    with_pool(|| unsafe {
        let workspace = shared_workspace()?;

        let apps: id = msg_send![workspace, runningApplications];
        if apps == nil {
            return Err(QueryError::Platform(
                "Failed to list running applications".to_string(),
            ));
        }

        let count: NSUInteger = msg_send![apps, count];
        let mut running = Vec::with_capacity(count as usize);
        for index in 0..count {
            let app: id = msg_send![apps, objectAtIndex: index];
            let active: BOOL = msg_send![app, isActive];
            running.push(RunningApp::new(app_info(app), active != NO));
        }

        Ok(running)
    })
}

/// Objects returned by AppKit are autoreleased; the query may run off the main thread
fn with_pool<T>(f: impl FnOnce() -> T) -> T {
    unsafe {
        let pool = NSAutoreleasePool::new(nil);
        let result = f();
        pool.drain();
        result
    }
}

unsafe fn shared_workspace() -> Result<id, QueryError> {
    let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
    if workspace == nil {
        return Err(QueryError::Platform(
            "Failed to get shared workspace".to_string(),
        ));
    }
    Ok(workspace)
}

unsafe fn app_info(app: id) -> ActiveApp {
    let name: id = msg_send![app, localizedName];
    let bundle_id: id = msg_send![app, bundleIdentifier];

    // Command-line processes have no bundle URL
    let url: id = msg_send![app, bundleURL];
    let path = if url != nil {
        let path: id = msg_send![url, path];
        nsstring_to_string(path).map(PathBuf::from)
    } else {
        None
    };

    ActiveApp::new(nsstring_to_string(name), nsstring_to_string(bundle_id), path)
}

unsafe fn nsstring_to_string(nsstring: id) -> Option<String> {
    if nsstring == nil {
        return None;
    }
    let bytes: *const std::os::raw::c_char = msg_send![nsstring, UTF8String];
    if bytes.is_null() {
        return None;
    }
    Some(
        std::ffi::CStr::from_ptr(bytes)
            .to_string_lossy()
            .into_owned(),
    )
}
