use ordo_util::errors::OrdoError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = OrdoError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_config_error_display() {
    let err = OrdoError::Config {
        message: "bad syntax".to_string(),
    };
    assert_eq!(err.to_string(), "Config error: bad syntax");
}

#[test]
fn test_catalog_error_display() {
    let err = OrdoError::Catalog {
        message: "missing version".to_string(),
    };
    assert_eq!(err.to_string(), "Catalog error: missing version");
}

#[test]
fn test_generic_error_display() {
    let err = OrdoError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let ordo_err: OrdoError = io_err.into();
    assert!(matches!(ordo_err, OrdoError::Io(_)));
}
