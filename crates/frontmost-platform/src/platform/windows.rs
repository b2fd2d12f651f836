//! Windows-specific active app detection

use frontmost_core::{ActiveApp, QueryError};
use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use std::path::PathBuf;
use tracing::debug;
use windows::core::PWSTR;
use windows::Win32::Foundation::{CloseHandle, HWND};
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows::Win32::UI::WindowsAndMessaging::{GetForegroundWindow, GetWindowTextW, GetWindowThreadProcessId};

pub fn frontmost_app() -> Result<Option<ActiveApp>, QueryError> {
    unsafe {
        let hwnd = GetForegroundWindow();
        if hwnd.0 == 0 {
            debug!("no foreground window");
            return Ok(None);
        }

        let mut process_id = 0u32;
        GetWindowThreadProcessId(hwnd, Some(&mut process_id));

        let path = process_image_path(process_id);
        let name = path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .or_else(|| window_title(hwnd));
        let bundle_id = path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().into_owned());

        Ok(Some(ActiveApp::new(name, bundle_id, path)))
    }
}

unsafe fn window_title(hwnd: HWND) -> Option<String> {
    let mut title_buf = [0u16; 512];
    let len = GetWindowTextW(hwnd, &mut title_buf);
    if len <= 0 {
        return None;
    }
    Some(
        OsString::from_wide(&title_buf[..len as usize])
            .to_string_lossy()
            .into_owned(),
    )
}

unsafe fn process_image_path(process_id: u32) -> Option<PathBuf> {
    let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, process_id)
        .map_err(|e| debug!(process_id, error = %e, "cannot open process"))
        .ok()?;

    let mut buf = [0u16; 1024];
    let mut len = buf.len() as u32;
    let result = QueryFullProcessImageNameW(handle, PROCESS_NAME_WIN32, PWSTR(buf.as_mut_ptr()), &mut len);
    let _ = CloseHandle(handle);
    result.ok()?;

    Some(PathBuf::from(OsString::from_wide(&buf[..len as usize])))
}
