use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

// Default identifier for scenario steps that do not carry their own.
pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let base = simplify_file_name(path);
    move |lineno| format!("{}-{:04}", base, lineno)
}
