//! Linux-specific active app detection using X11

use frontmost_core::{ActiveApp, QueryError, RunningApp};
use std::path::PathBuf;
use tracing::debug;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{Atom, AtomEnum, ConnectionExt, GetPropertyReply, Window};
use x11rb::rust_connection::RustConnection;

pub fn frontmost_app() -> Result<Option<ActiveApp>, QueryError> {
    let session = Session::connect()?;

    match session.active_window()? {
        Some(window) => Ok(Some(session.app_info(window)?)),
        None => {
            debug!("_NET_ACTIVE_WINDOW is unset");
            Ok(None)
        }
    }
}

pub fn running_apps() -> Result<Vec<RunningApp>, QueryError> {
    let session = Session::connect()?;
    let active = session.active_window()?;

    let reply = session.property(session.root, session.atoms.net_client_list, AtomEnum::WINDOW.into(), u32::MAX)?;
    let windows: Vec<Window> = reply
        .value32()
        .map(|values| values.collect())
        .unwrap_or_default();

    Ok(collect_running(windows, active, |window| session.app_info(window)))
}

/// Windows can close between the client list read and their property reads;
/// those are skipped rather than failing the whole listing.
fn collect_running<F>(windows: Vec<Window>, active: Option<Window>, mut app_info: F) -> Vec<RunningApp>
where
    F: FnMut(Window) -> Result<ActiveApp, QueryError>,
{
    windows
        .into_iter()
        .filter_map(|window| match app_info(window) {
            Ok(app) => Some(RunningApp::new(app, Some(window) == active)),
            Err(e) => {
                debug!(window, error = %e, "skipping window");
                None
            }
        })
        .collect()
}

struct Atoms {
    net_active_window: Atom,
    net_client_list: Atom,
    net_wm_pid: Atom,
    gtk_application_id: Atom,
    utf8_string: Atom,
}

struct Session {
    conn: RustConnection,
    root: Window,
    atoms: Atoms,
}

impl Session {
    fn connect() -> Result<Self, QueryError> {
        let (conn, screen_num) = RustConnection::connect(None)
            .map_err(|e| QueryError::Platform(format!("X11 connection failed: {}", e)))?;
        let root = conn.setup().roots[screen_num].root;

        let atoms = Atoms {
            net_active_window: intern(&conn, b"_NET_ACTIVE_WINDOW")?,
            net_client_list: intern(&conn, b"_NET_CLIENT_LIST")?,
            net_wm_pid: intern(&conn, b"_NET_WM_PID")?,
            gtk_application_id: intern(&conn, b"_GTK_APPLICATION_ID")?,
            utf8_string: intern(&conn, b"UTF8_STRING")?,
        };

        Ok(Self { conn, root, atoms })
    }

    fn property(&self, window: Window, property: Atom, kind: Atom, length: u32) -> Result<GetPropertyReply, QueryError> {
        self.conn
            .get_property(false, window, property, kind, 0, length)
            .map_err(|e| QueryError::Platform(format!("Failed to get property: {}", e)))?
            .reply()
            .map_err(|e| QueryError::Platform(format!("Failed to get property reply: {}", e)))
    }

    fn active_window(&self) -> Result<Option<Window>, QueryError> {
        let reply = self.property(self.root, self.atoms.net_active_window, AtomEnum::WINDOW.into(), 1)?;

        Ok(reply
            .value32()
            .and_then(|mut values| values.next())
            .filter(|&window| window != 0))
    }

    fn app_info(&self, window: Window) -> Result<ActiveApp, QueryError> {
        let class = self.property(window, AtomEnum::WM_CLASS.into(), AtomEnum::STRING.into(), 1024)?;
        let (instance, class_name) = split_wm_class(&class.value);

        let app_id = self.property(window, self.atoms.gtk_application_id, self.atoms.utf8_string, 1024)?;
        let app_id = String::from_utf8_lossy(&app_id.value).trim_end_matches('\0').to_string();

        let pid = self
            .property(window, self.atoms.net_wm_pid, AtomEnum::CARDINAL.into(), 1)?
            .value32()
            .and_then(|mut values| values.next());
        let path = pid.and_then(executable_path);

        debug!(window, ?instance, ?class_name, ?pid, "resolved window owner");

        let name = class_name.or_else(|| instance.clone());
        let bundle_id = if app_id.is_empty() { instance } else { Some(app_id) };
        Ok(ActiveApp::new(name, bundle_id, path))
    }
}

fn intern(conn: &RustConnection, name: &[u8]) -> Result<Atom, QueryError> {
    Ok(conn
        .intern_atom(false, name)
        .map_err(|e| QueryError::Platform(format!("Failed to intern atom: {}", e)))?
        .reply()
        .map_err(|e| QueryError::Platform(format!("Failed to get atom reply: {}", e)))?
        .atom)
}

/// WM_CLASS holds two null-terminated strings: instance name and class name
fn split_wm_class(value: &[u8]) -> (Option<String>, Option<String>) {
    let text = String::from_utf8_lossy(value);
    let mut parts = text
        .split('\0')
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    (parts.next(), parts.next())
}

fn executable_path(pid: u32) -> Option<PathBuf> {
    std::fs::read_link(format!("/proc/{}/exe", pid))
        .map_err(|e| debug!(pid, error = %e, "cannot resolve executable"))
        .ok()
}
