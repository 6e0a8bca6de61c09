use httpfromtcp::config::Config;

#[test]
fn test_config_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.listen_addr, "127.0.0.1:42069");
    assert_eq!(cfg.max_request_bytes, 4096);
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml("listen_addr: 0.0.0.0:8080\nmax_request_bytes: 8192\n").unwrap();
    assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
    assert_eq!(cfg.max_request_bytes, 8192);
}

#[test]
fn test_config_from_yaml_partial_uses_defaults() {
    let cfg = Config::from_yaml("listen_addr: 127.0.0.1:3000\n").unwrap();
    assert_eq!(cfg.listen_addr, "127.0.0.1:3000");
    assert_eq!(cfg.max_request_bytes, 4096);
}

#[test]
fn test_config_rejects_zero_buffer() {
    assert!(Config::from_yaml("max_request_bytes: 0\n").is_err());
}

#[test]
fn test_config_rejects_bad_yaml() {
    assert!(Config::from_yaml("max_request_bytes: lots\n").is_err());
}

#[test]
fn test_config_from_file() {
    let path = std::env::temp_dir().join(format!("httpfromtcp-{}.yaml", std::process::id()));
    std::fs::write(&path, "listen_addr: 127.0.0.1:9999\n").unwrap();

    let cfg = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(cfg.listen_addr, "127.0.0.1:9999");
}

#[test]
fn test_config_missing_file() {
    assert!(Config::from_file("/nonexistent/httpfromtcp.yaml").is_err());
}

#[test]
fn test_config_listen_from_env() {
    unsafe {
        std::env::remove_var("CONFIG");
        std::env::set_var("LISTEN", "0.0.0.0:5000");
    }
    let cfg = Config::load().unwrap();
    unsafe {
        std::env::remove_var("LISTEN");
    }

    assert_eq!(cfg.listen_addr, "0.0.0.0:5000");
    assert_eq!(cfg.max_request_bytes, 4096);
}

#[test]
fn test_config_body_limit() {
    let cfg = Config::from_yaml("max_body_bytes: 1024\n").unwrap();
    let limits = cfg.limits();

    assert_eq!(limits.max_body_bytes, 1024);
    assert_eq!(limits.max_request_bytes, 4096);
    assert_eq!(Config::default().max_body_bytes, 8 * 1024 * 1024);
}
