//! Retrieves information about the version of the binary from Git and the build
//! environment. shadow-rs writes it to the output directory and it is exposed
//! at runtime through [`fenhash::version`].

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
