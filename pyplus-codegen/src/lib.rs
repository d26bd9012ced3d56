//! PyPlus translator - C++ Pretty-Printer
//!
//! This crate serialises the target tree produced by `pyplus-translate`
//! into C++ source text. Skipped constructs come out as `//TODO:` comments
//! followed by the original source, so the file stays compilable.

pub mod printer;

pub use printer::{escape_string, expression, CppPrinter};

use log::debug;
use pyplus_translate::TargetProgram;

/// Main entry point for code generation
pub fn generate_cpp(program: &TargetProgram) -> String {
    let text = CppPrinter::new().print_program(program);
    debug!(
        "Generated {} lines of C++ for {} top-level items",
        text.lines().count(),
        program.items.len()
    );
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_program_has_main() {
        let text = generate_cpp(&TargetProgram::default());
        assert_eq!(text, "int main(int argc, char **argv)\n{\n}\n");
    }
}
