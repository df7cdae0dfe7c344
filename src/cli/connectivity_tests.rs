use super::*;

#[test]
fn plain_host_base_resolves_api_paths() {
    let c = FilesClient::new("http://127.0.0.1:5000").unwrap();
    assert_eq!(c.url("api/files").unwrap().as_str(), "http://127.0.0.1:5000/api/files");
    assert_eq!(c.url("health").unwrap().as_str(), "http://127.0.0.1:5000/health");
}

#[test]
fn base_path_prefix_is_kept() {
    for base in ["http://host/proxy", "http://host/proxy/"] {
        let c = FilesClient::new(base).unwrap();
        assert_eq!(c.base().as_str(), "http://host/proxy/");
        assert_eq!(c.url("api/files").unwrap().as_str(), "http://host/proxy/api/files");
        assert_eq!(c.url("health").unwrap().as_str(), "http://host/proxy/health");
        assert_eq!(c.file_url("abc").unwrap().as_str(), "http://host/proxy/api/files/abc");
    }
}

#[test]
fn file_ids_are_path_escaped() {
    let c = FilesClient::new("http://host/proxy/").unwrap();
    assert_eq!(c.file_url("a b/c").unwrap().as_str(), "http://host/proxy/api/files/a%20b%2Fc");
}

#[test]
fn invalid_base_is_rejected() {
    assert!(FilesClient::new("not a url").is_err());
}
