// Convergence classification for LibreNMS error responses.
//
// LibreNMS reports a duplicate device as HTTP 500 and a missing device as a
// plain error message. Neither carries a machine-readable code, so the only
// signal is the wording of the `message` field. Every check on that wording
// lives here and nowhere else.

use crate::error::Error;

/// Marker in a POST failure meaning the device is already registered.
pub const ALREADY_EXISTS: &str = "already exists";

/// Marker in a DELETE failure meaning the device is already gone.
pub const NOT_FOUND: &str = "not found";

/// Status LibreNMS uses for duplicate-device conflicts.
const CONFLICT_STATUS: u16 = 500;

/// Does a POST answer with this status and message mean "already present"?
pub fn is_already_present(status: u16, message: &str) -> bool {
    status == CONFLICT_STATUS && message.contains(ALREADY_EXISTS)
}

/// Does this DELETE failure mean "already absent"?
///
/// Only messages written by the service count. A transport failure whose
/// text happens to contain the marker (e.g. a DNS resolver message) does not.
pub fn is_already_absent(err: &Error) -> bool {
    match err {
        Error::Http { message, .. } => message.contains(NOT_FOUND),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, message: &str) -> Error {
        Error::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    #[test]
    fn duplicate_device_message_is_already_present() {
        assert!(is_already_present(
            500,
            "Device 192.168.1.1 already exists"
        ));
        assert!(is_already_present(
            500,
            "Already have device 192.168.1.1 (hostname already exists)"
        ));
    }

    #[test]
    fn already_exists_needs_status_500() {
        assert!(!is_already_present(400, "Device 192.168.1.1 already exists"));
        assert!(!is_already_present(200, "Device 192.168.1.1 already exists"));
    }

    #[test]
    fn other_server_errors_are_not_already_present() {
        assert!(!is_already_present(500, "Could not connect to 192.168.1.1, please check the snmp details and snmp reachability"));
        assert!(!is_already_present(500, ""));
    }

    #[test]
    fn marker_match_is_case_sensitive() {
        assert!(!is_already_present(500, "Device ALREADY EXISTS"));
        assert!(!is_already_absent(&http(404, "Device Not Found")));
    }

    #[test]
    fn missing_device_message_is_already_absent() {
        assert!(is_already_absent(&http(404, "Device 192.168.1.1 not found")));
        assert!(is_already_absent(&http(500, "Device 192.168.1.1 not found")));
    }

    #[test]
    fn other_delete_failures_are_not_already_absent() {
        assert!(!is_already_absent(&http(401, "Unauthenticated.")));
        assert!(!is_already_absent(&http(500, "Failed to delete device")));
        assert!(!is_already_absent(&Error::Timeout { timeout_secs: 30 }));
    }

    #[test]
    fn transport_text_never_counts_as_absent() {
        let err = Error::Transport {
            message: "dns error: host not found".into(),
        };
        assert!(!is_already_absent(&err));
    }
}
