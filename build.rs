// build.rs

use std::env;

fn main() -> anyhow::Result<()> {
    // Necessary because of this issue: https://github.com/rust-lang/cargo/issues/9641
    // see also https://github.com/rust-lang/cargo/issues/9554
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::build::CfgArgs::output_propagated("ESP_IDF")?;
        embuild::build::LinkArgs::output_propagated("ESP_IDF")?;
    }

    let ap_ssid = env::var("AP_SSID").unwrap_or_else(|_| "SmartHouse_AP".into());
    let ap_pass = env::var("AP_PASS").unwrap_or_else(|_| "12345678".into());
    let api_port = env::var("API_PORT").unwrap_or_else(|_| "80".into());

    println!("cargo:rustc-env=AP_SSID={ap_ssid}");
    println!("cargo:rustc-env=AP_PASS={ap_pass}");
    println!("cargo:rustc-env=API_PORT={api_port}");
    println!("cargo:rerun-if-env-changed=AP_SSID");
    println!("cargo:rerun-if-env-changed=AP_PASS");
    println!("cargo:rerun-if-env-changed=API_PORT");

    Ok(())
}

// EOF
