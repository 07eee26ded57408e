//! Binary entrypoint for the PDF chat server.

use std::process::ExitCode;

use pdf_chat::start_pdf_chat;

fn main() -> ExitCode {
    start_pdf_chat::run()
}
