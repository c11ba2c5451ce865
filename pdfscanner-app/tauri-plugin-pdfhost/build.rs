const COMMANDS: &[&str] = &[
    "save_to_downloads",
    "scan_file",
    "get_initial_pdf_path",
    "register_listener",
    "unregister_listener",
    "dispatch",
];

fn main() {
    // Activations reach Rust through the JNI entry point in pdfscanner-host,
    // so no Kotlin/Swift plugin project is built here.
    tauri_plugin::Builder::new(COMMANDS).build();
}
