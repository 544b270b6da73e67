//! HTTP status codes as a typed enum.
//!
//! Only the codes the header builder knows a reason phrase for are named
//! here. [`build_header`](crate::response::build_header) still accepts any
//! `u16`; an unknown code simply gets an empty reason phrase.
//!
//! ```rust
//! use sceneprobe::Status;
//!
//! let code: u16 = Status::NotImplemented.into();
//! assert_eq!(code, 501);
//! assert_eq!(Status::NotImplemented.reason(), "Not Implemented");
//! ```

/// The status codes sceneprobe can emit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Ok,                  // 200
    BadRequest,          // 400
    Forbidden,           // 403
    NotFound,            // 404
    InternalServerError, // 500
    NotImplemented,      // 501
}

impl Status {
    /// The literal reason phrase for this status.
    pub fn reason(self) -> &'static str {
        reason_phrase(self.into())
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        match s {
            Status::Ok                  => 200,
            Status::BadRequest          => 400,
            Status::Forbidden           => 403,
            Status::NotFound            => 404,
            Status::InternalServerError => 500,
            Status::NotImplemented      => 501,
        }
    }
}

/// Reason phrase for a numeric status code, or `""` for codes outside the table.
pub fn reason_phrase(code: u16) -> &'static str {
    match code {
        200 => "OK",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        _   => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_named_status_has_its_literal_phrase() {
        let table = [
            (Status::Ok, 200, "OK"),
            (Status::BadRequest, 400, "Bad Request"),
            (Status::Forbidden, 403, "Forbidden"),
            (Status::NotFound, 404, "Not Found"),
            (Status::InternalServerError, 500, "Internal Server Error"),
            (Status::NotImplemented, 501, "Not Implemented"),
        ];
        for (status, code, phrase) in table {
            assert_eq!(u16::from(status), code);
            assert_eq!(status.reason(), phrase);
        }
    }

    #[test]
    fn unknown_codes_have_no_phrase() {
        assert_eq!(reason_phrase(418), "");
        assert_eq!(reason_phrase(0), "");
        assert_eq!(reason_phrase(u16::MAX), "");
    }
}
