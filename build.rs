use std::env;
use std::fs;
use std::path::Path;

/// Keys forwarded from `.env` into compile-time env (read back with `option_env!`).
const FORWARDED_KEYS: &[&str] = &[
    "API_URL",
    "USE_MOCK_API",
    "REQUEST_TIMEOUT_MS",
    "NOTIFICATION_DURATION_MS",
    "ENABLE_LOGGING",
];

fn main() {
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                let Some((key, value)) = line.split_once('=') else {
                    continue;
                };
                let key = key.trim();
                let value = value.trim().trim_matches('"');

                if !FORWARDED_KEYS.contains(&key) {
                    println!("cargo:warning=Ignoring unknown .env key: {}", key);
                    continue;
                }

                // Real environment wins over .env
                if env::var(key).is_err() {
                    println!("cargo:rustc-env={}={}", key, value);
                }
            }
        }
    }

    for key in FORWARDED_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=build.rs");
}
