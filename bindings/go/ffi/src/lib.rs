//! C-FFI layer for hclfmt — used by Go (cgo) and other FFI consumers.
//!
//! ZERO logic here. All calls delegate to `hclfmt-core`.
//!
//! # Memory Contract
//!
//! All functions that return `*mut c_char` allocate via `CString`.
//! The caller MUST free the returned string by calling `hclfmt_free_string()`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Result from an hclfmt FFI call.
/// If `error` is null, the call succeeded and `result` contains the output.
/// If `error` is non-null, the call failed and `error` contains the error message.
/// The caller MUST free both `result` and `error` with `hclfmt_free_string()`.
#[repr(C)]
pub struct HclfmtResult {
    pub result: *mut c_char,
    pub error: *mut c_char,
}

impl HclfmtResult {
    fn ok(value: String) -> Self {
        HclfmtResult {
            result: CString::new(value).unwrap_or_default().into_raw(),
            error: std::ptr::null_mut(),
        }
    }

    fn err(msg: String) -> Self {
        HclfmtResult {
            result: std::ptr::null_mut(),
            error: CString::new(msg).unwrap_or_default().into_raw(),
        }
    }
}

/// Helper: convert a C string pointer to its bytes.
/// Returns None if the pointer is null.
unsafe fn cstr_to_bytes<'a>(ptr: *const c_char) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_bytes())
}

/// Format HCL configuration text to canonical form.
///
/// Syntax errors do not fail the call; the document is formatted as far as
/// it could be parsed. Use `hclfmt_validate()` to inspect them.
///
/// # Safety
/// `text` must be a valid null-terminated C string.
/// The caller must free the returned strings with `hclfmt_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn hclfmt_format(text: *const c_char) -> HclfmtResult {
    let text = match cstr_to_bytes(text) {
        Some(bytes) => bytes,
        None => return HclfmtResult::err("null input".into()),
    };

    match String::from_utf8(hclfmt_core::format_hcl(text)) {
        Ok(output) => HclfmtResult::ok(output),
        Err(e) => HclfmtResult::err(format!("Output is not valid UTF-8: {}", e)),
    }
}

/// Parse HCL configuration text and report its diagnostics.
/// Returns JSON: { "valid": bool, "errors": n, "warnings": n, "diagnostics": [...] }
///
/// # Safety
/// `text` must be a valid null-terminated C string.
/// The caller must free the returned strings with `hclfmt_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn hclfmt_validate(text: *const c_char) -> HclfmtResult {
    let text = match cstr_to_bytes(text) {
        Some(bytes) => bytes,
        None => return HclfmtResult::err("null input".into()),
    };

    let (_, diagnostics) = hclfmt_core::parse_config_bytes(text);
    let output = serde_json::json!({
        "valid": !diagnostics.has_errors(),
        "errors": diagnostics.errors().len(),
        "warnings": diagnostics.warnings().len(),
        "diagnostics": diagnostics.diagnostics,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => HclfmtResult::ok(json),
        Err(e) => HclfmtResult::err(format!("Serialization error: {}", e)),
    }
}

/// Free a string allocated by hclfmt.
///
/// # Safety
/// `ptr` must be null or a pointer previously returned by an hclfmt function.
/// Must not be called twice on the same pointer.
#[no_mangle]
pub unsafe extern "C" fn hclfmt_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Take ownership of both sides of a result
    unsafe fn take(result: HclfmtResult) -> (Option<String>, Option<String>) {
        let read = |ptr: *mut c_char| {
            if ptr.is_null() {
                None
            } else {
                let s = CStr::from_ptr(ptr).to_string_lossy().into_owned();
                hclfmt_free_string(ptr);
                Some(s)
            }
        };
        (read(result.result), read(result.error))
    }

    #[test]
    fn test_format() {
        let input = CString::new("a = \"${b}\"\n").unwrap();
        let (result, error) = unsafe { take(hclfmt_format(input.as_ptr())) };
        assert_eq!(result.as_deref(), Some("a = b\n"));
        assert!(error.is_none());
    }

    #[test]
    fn test_format_null_input() {
        let (result, error) = unsafe { take(hclfmt_format(std::ptr::null())) };
        assert!(result.is_none());
        assert_eq!(error.as_deref(), Some("null input"));
    }

    #[test]
    fn test_validate_reports_errors() {
        let input = CString::new("a {\n").unwrap();
        let (result, error) = unsafe { take(hclfmt_validate(input.as_ptr())) };
        assert!(error.is_none());
        let json: serde_json::Value = serde_json::from_str(&result.unwrap()).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"], 1);
    }

    #[test]
    fn test_validate_valid() {
        let input = CString::new("variable \"v\" {\n  type = list\n}\n").unwrap();
        let (result, _) = unsafe { take(hclfmt_validate(input.as_ptr())) };
        let json: serde_json::Value = serde_json::from_str(&result.unwrap()).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["warnings"], 0);
    }

    #[test]
    fn test_free_null_is_noop() {
        unsafe { hclfmt_free_string(std::ptr::null_mut()) };
    }
}
