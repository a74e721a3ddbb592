use std::error;
use std::fmt;

/// Convenient result type for replica set operations using [`ReplSetError`] as the error type.
///
/// This type alias reduces boilerplate when working with fallible reconciliation
/// operations. Most functions in this crate return this type.
pub type ReplSetResult<T> = Result<T, ReplSetError>;

/// Main error type for replica set reconciliation operations.
///
/// [`ReplSetError`] provides a comprehensive error system that can represent single errors,
/// errors with additional detail, or multiple aggregated errors. The design allows for
/// rich error information while maintaining ergonomic usage patterns.
#[derive(Debug, Clone)]
pub struct ReplSetError {
    repr: ErrorRepr,
}

/// Internal representation of error data.
///
/// This enum supports different error patterns while maintaining a unified interface.
/// Users should not interact with this type directly but use [`ReplSetError`] methods instead.
#[derive(Debug, Clone)]
enum ErrorRepr {
    /// Error with kind and static description
    WithDescription(ErrorKind, &'static str),
    /// Error with kind, static description, and dynamic detail
    WithDescriptionAndDetail(ErrorKind, &'static str, String),
    /// Multiple aggregated errors
    Many(Vec<ReplSetError>),
}

/// Specific categories of errors that can occur during reconciliation.
///
/// This enum provides granular error classification to enable appropriate error handling
/// strategies. Error kinds are organized by functional area and failure mode.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    // Cluster Errors
    ClusterConnectionFailed,
    PodListFailed,

    // Database Admin Errors
    AdminConnectionFailed,
    AdminCommandFailed,
    NotPrimary,
    NotYetInitialized,

    // Reconfiguration Errors
    StaleConfigVersion,

    // Configuration Errors
    ConfigError,

    // Data Errors
    InvalidData,

    // State & Workflow Errors
    InvalidState,
    ReconcileWorkerPanic,

    // IO & Serialization Errors
    IoError,
    SerializationError,
    DeserializationError,

    // Unknown / Uncategorized
    Unknown,
}

impl ReplSetError {
    /// Creates a [`ReplSetError`] containing multiple aggregated errors.
    ///
    /// This is useful when multiple operations fail and you want to report all failures
    /// rather than just the first one.
    pub fn many(errors: Vec<ReplSetError>) -> ReplSetError {
        ReplSetError {
            repr: ErrorRepr::Many(errors),
        }
    }

    /// Returns the [`ErrorKind`] of this error.
    ///
    /// For multiple errors, returns the kind of the first error or [`ErrorKind::Unknown`]
    /// if the error list is empty.
    pub fn kind(&self) -> ErrorKind {
        match self.repr {
            ErrorRepr::WithDescription(kind, _)
            | ErrorRepr::WithDescriptionAndDetail(kind, _, _) => kind,
            ErrorRepr::Many(ref errors) => errors
                .first()
                .map(|err| err.kind())
                .unwrap_or(ErrorKind::Unknown),
        }
    }

    /// Returns all [`ErrorKind`]s present in this error.
    ///
    /// For single errors, returns a vector with one element. For multiple errors,
    /// returns a flattened vector of all error kinds.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        match self.repr {
            ErrorRepr::WithDescription(kind, _)
            | ErrorRepr::WithDescriptionAndDetail(kind, _, _) => vec![kind],
            ErrorRepr::Many(ref errors) => errors
                .iter()
                .flat_map(|err| err.kinds())
                .collect::<Vec<_>>(),
        }
    }

    /// Returns the detailed error information if available.
    ///
    /// For multiple errors, returns the detail of the first error that has one.
    /// Returns [`None`] if no detailed information is available.
    pub fn detail(&self) -> Option<&str> {
        match self.repr {
            ErrorRepr::WithDescriptionAndDetail(_, _, ref detail) => Some(detail.as_str()),
            ErrorRepr::Many(ref errors) => {
                // For multiple errors, return the detail of the first error that has one
                errors.iter().find_map(|e| e.detail())
            }
            _ => None,
        }
    }
}

impl PartialEq for ReplSetError {
    fn eq(&self, other: &ReplSetError) -> bool {
        match (&self.repr, &other.repr) {
            (ErrorRepr::WithDescription(kind_a, _), ErrorRepr::WithDescription(kind_b, _)) => {
                kind_a == kind_b
            }
            (
                ErrorRepr::WithDescriptionAndDetail(kind_a, _, _),
                ErrorRepr::WithDescriptionAndDetail(kind_b, _, _),
            ) => kind_a == kind_b,
            (ErrorRepr::Many(errors_a), ErrorRepr::Many(errors_b)) => {
                errors_a.len() == errors_b.len()
                    && errors_a.iter().zip(errors_b.iter()).all(|(a, b)| a == b)
            }
            _ => false,
        }
    }
}

impl fmt::Display for ReplSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.repr {
            ErrorRepr::WithDescription(kind, desc) => {
                fmt::Debug::fmt(&kind, f)?;
                f.write_str(": ")?;
                desc.fmt(f)?;

                Ok(())
            }
            ErrorRepr::WithDescriptionAndDetail(kind, desc, ref detail) => {
                fmt::Debug::fmt(&kind, f)?;
                f.write_str(": ")?;
                desc.fmt(f)?;
                f.write_str(" -> ")?;
                detail.fmt(f)?;

                Ok(())
            }
            ErrorRepr::Many(ref errors) => {
                if errors.is_empty() {
                    write!(f, "Multiple errors occurred (empty)")?;
                } else if errors.len() == 1 {
                    // If there's only one error, just display it directly
                    errors[0].fmt(f)?;
                } else {
                    write!(f, "Multiple errors occurred ({} total):", errors.len())?;
                    for (i, error) in errors.iter().enumerate() {
                        write!(f, "\n  {}: {}", i + 1, error)?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl error::Error for ReplSetError {}

/// Creates a [`ReplSetError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for ReplSetError {
    fn from((kind, desc): (ErrorKind, &'static str)) -> ReplSetError {
        ReplSetError {
            repr: ErrorRepr::WithDescription(kind, desc),
        }
    }
}

/// Creates a [`ReplSetError`] from an error kind, static description, and dynamic detail.
impl From<(ErrorKind, &'static str, String)> for ReplSetError {
    fn from((kind, desc, detail): (ErrorKind, &'static str, String)) -> ReplSetError {
        ReplSetError {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, desc, detail),
        }
    }
}

/// Creates a [`ReplSetError`] from a vector of errors for aggregation.
impl<E> From<Vec<E>> for ReplSetError
where
    E: Into<ReplSetError>,
{
    fn from(errors: Vec<E>) -> ReplSetError {
        ReplSetError {
            repr: ErrorRepr::Many(errors.into_iter().map(Into::into).collect()),
        }
    }
}

// Common standard library error conversions

/// Converts [`std::io::Error`] to [`ReplSetError`] with [`ErrorKind::IoError`].
impl From<std::io::Error> for ReplSetError {
    fn from(err: std::io::Error) -> ReplSetError {
        ReplSetError {
            repr: ErrorRepr::WithDescriptionAndDetail(
                ErrorKind::IoError,
                "I/O error occurred",
                err.to_string(),
            ),
        }
    }
}

/// Converts [`tokio::task::JoinError`] to [`ReplSetError`] with
/// [`ErrorKind::ReconcileWorkerPanic`].
impl From<tokio::task::JoinError> for ReplSetError {
    fn from(err: tokio::task::JoinError) -> ReplSetError {
        ReplSetError {
            repr: ErrorRepr::WithDescriptionAndDetail(
                ErrorKind::ReconcileWorkerPanic,
                "Reconcile worker task failed",
                err.to_string(),
            ),
        }
    }
}

/// Converts [`serde_json::Error`] to [`ReplSetError`] with appropriate error kind.
///
/// Maps to [`ErrorKind::SerializationError`] for serialization failures and
/// [`ErrorKind::DeserializationError`] for deserialization failures based on error classification.
impl From<serde_json::Error> for ReplSetError {
    fn from(err: serde_json::Error) -> ReplSetError {
        let (kind, description) = match err.classify() {
            serde_json::error::Category::Io => (ErrorKind::IoError, "JSON I/O operation failed"),
            serde_json::error::Category::Syntax | serde_json::error::Category::Data => (
                ErrorKind::DeserializationError,
                "JSON deserialization failed",
            ),
            serde_json::error::Category::Eof => (
                ErrorKind::DeserializationError,
                "JSON deserialization failed",
            ),
        };

        ReplSetError {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, description, err.to_string()),
        }
    }
}

/// Converts [`kube::Error`] to [`ReplSetError`] with appropriate error kind.
///
/// Maps API-level rejections to [`ErrorKind::PodListFailed`] and transport,
/// auth, and configuration failures to [`ErrorKind::ClusterConnectionFailed`].
#[cfg(feature = "kubernetes")]
impl From<kube::Error> for ReplSetError {
    fn from(err: kube::Error) -> ReplSetError {
        let (kind, description) = match &err {
            kube::Error::Api(_) => (
                ErrorKind::PodListFailed,
                "Kubernetes API request was rejected",
            ),
            kube::Error::Auth(_) => (
                ErrorKind::ClusterConnectionFailed,
                "Kubernetes authentication failed",
            ),
            _ => (
                ErrorKind::ClusterConnectionFailed,
                "Kubernetes cluster is unreachable",
            ),
        };

        ReplSetError {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, description, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bail, replset_error};

    #[test]
    fn test_simple_error_creation() {
        let err = ReplSetError::from((
            ErrorKind::AdminConnectionFailed,
            "Database connection failed",
        ));
        assert_eq!(err.kind(), ErrorKind::AdminConnectionFailed);
        assert_eq!(err.detail(), None);
        assert_eq!(err.kinds(), vec![ErrorKind::AdminConnectionFailed]);
    }

    #[test]
    fn test_error_with_detail() {
        let err = ReplSetError::from((
            ErrorKind::AdminCommandFailed,
            "Admin command execution failed",
            "replSetGetStatus returned ok: 0".to_string(),
        ));
        assert_eq!(err.kind(), ErrorKind::AdminCommandFailed);
        assert_eq!(err.detail(), Some("replSetGetStatus returned ok: 0"));
        assert_eq!(err.kinds(), vec![ErrorKind::AdminCommandFailed]);
    }

    #[test]
    fn test_multiple_errors() {
        let errors = vec![
            ReplSetError::from((ErrorKind::PodListFailed, "Pod listing failed")),
            ReplSetError::from((ErrorKind::InvalidData, "Malformed status document")),
            ReplSetError::from((ErrorKind::IoError, "Connection timeout")),
        ];
        let multi_err = ReplSetError::many(errors);

        assert_eq!(multi_err.kind(), ErrorKind::PodListFailed);
        assert_eq!(
            multi_err.kinds(),
            vec![
                ErrorKind::PodListFailed,
                ErrorKind::InvalidData,
                ErrorKind::IoError
            ]
        );
        assert_eq!(multi_err.detail(), None);
    }

    #[test]
    fn test_multiple_errors_with_detail() {
        let errors = vec![
            ReplSetError::from((
                ErrorKind::InvalidData,
                "Malformed status document",
                "missing members array".to_string(),
            )),
            ReplSetError::from((ErrorKind::NotPrimary, "Node is not the primary")),
        ];
        let multi_err = ReplSetError::many(errors);

        assert_eq!(multi_err.detail(), Some("missing members array"));
    }

    #[test]
    fn test_from_vector() {
        let errors = vec![
            ReplSetError::from((ErrorKind::InvalidData, "Error 1")),
            ReplSetError::from((ErrorKind::NotPrimary, "Error 2")),
        ];
        let multi_err = ReplSetError::from(errors);
        assert_eq!(multi_err.kinds().len(), 2);
    }

    #[test]
    fn test_empty_multiple_errors() {
        let multi_err = ReplSetError::many(vec![]);
        assert_eq!(multi_err.kind(), ErrorKind::Unknown);
        assert_eq!(multi_err.kinds(), vec![]);
        assert_eq!(multi_err.detail(), None);
    }

    #[test]
    fn test_error_equality() {
        let err1 = ReplSetError::from((ErrorKind::AdminConnectionFailed, "Connection failed"));
        let err2 = ReplSetError::from((ErrorKind::AdminConnectionFailed, "Connection failed"));
        let err3 = ReplSetError::from((ErrorKind::AdminCommandFailed, "Command failed"));

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }

    #[test]
    fn test_error_display() {
        let err = ReplSetError::from((
            ErrorKind::AdminConnectionFailed,
            "Database connection failed",
        ));
        let display_str = format!("{err}");
        assert!(display_str.contains("ConnectionFailed"));
        assert!(display_str.contains("Database connection failed"));
    }

    #[test]
    fn test_error_display_with_detail() {
        let err = ReplSetError::from((
            ErrorKind::AdminCommandFailed,
            "Admin command failed",
            "replSetReconfig rejected".to_string(),
        ));
        let display_str = format!("{err}");
        assert!(display_str.contains("CommandFailed"));
        assert!(display_str.contains("Admin command failed"));
        assert!(display_str.contains("replSetReconfig rejected"));
    }

    #[test]
    fn test_multiple_errors_display() {
        let errors = vec![
            ReplSetError::from((ErrorKind::InvalidData, "Malformed document")),
            ReplSetError::from((ErrorKind::NotPrimary, "Node stepped down")),
        ];
        let multi_err = ReplSetError::many(errors);
        let display_str = format!("{multi_err}");
        assert!(display_str.contains("Multiple errors"));
        assert!(display_str.contains("2 total"));
    }

    #[test]
    fn test_macro_usage() {
        let err = replset_error!(ErrorKind::InvalidData, "Invalid member document");
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(err.detail(), None);

        let err_with_detail = replset_error!(
            ErrorKind::NotPrimary,
            "Node is not the primary",
            "current state is SECONDARY"
        );
        assert_eq!(err_with_detail.kind(), ErrorKind::NotPrimary);
        assert!(err_with_detail.detail().unwrap().contains("SECONDARY"));
    }

    #[test]
    fn test_bail_macro() {
        fn test_function() -> ReplSetResult<i32> {
            bail!(ErrorKind::InvalidData, "Test error");
        }

        fn test_function_with_detail() -> ReplSetResult<i32> {
            bail!(ErrorKind::NotPrimary, "Test error", "Additional detail");
        }

        let result = test_function();
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);

        let result = test_function_with_detail();
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotPrimary);
        assert!(err.detail().unwrap().contains("Additional detail"));
    }

    #[test]
    fn test_nested_multiple_errors() {
        let inner_errors = vec![
            ReplSetError::from((ErrorKind::InvalidData, "Inner error 1")),
            ReplSetError::from((ErrorKind::NotPrimary, "Inner error 2")),
        ];
        let inner_multi = ReplSetError::many(inner_errors);

        let outer_errors = vec![
            inner_multi,
            ReplSetError::from((ErrorKind::IoError, "Outer error")),
        ];
        let outer_multi = ReplSetError::many(outer_errors);

        let kinds = outer_multi.kinds();
        assert_eq!(kinds.len(), 3);
        assert!(kinds.contains(&ErrorKind::InvalidData));
        assert!(kinds.contains(&ErrorKind::NotPrimary));
        assert!(kinds.contains(&ErrorKind::IoError));
    }

    #[test]
    fn test_json_error_classification() {
        // Test syntax error during deserialization
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let rs_err = ReplSetError::from(json_err);
        assert_eq!(rs_err.kind(), ErrorKind::DeserializationError);
        assert!(rs_err.detail().unwrap().contains("expected"));

        // Test data error during deserialization
        let json_err = serde_json::from_str::<bool>("\"not_a_bool\"").unwrap_err();
        let rs_err = ReplSetError::from(json_err);
        assert_eq!(rs_err.kind(), ErrorKind::DeserializationError);
        assert!(rs_err.detail().is_some());
    }
}
