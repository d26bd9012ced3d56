use anyhow::{bail, Context, Result};
use log::{debug, info};
use pyplus_codegen::generate_cpp;
use pyplus_frontend::Frontend;
use pyplus_translate::{translate, Translation, TranslatorConfig};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One translated input
#[derive(Debug)]
pub struct Outcome {
    pub input: PathBuf,
    pub cpp: String,
    pub translation: Translation,
}

impl Outcome {
    /// Base name for the files generated from this input
    pub fn stem(&self) -> String {
        output_stem(&self.input)
    }
}

/// `tests/hello.ast.json` -> `hello`
pub fn output_stem(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}

/// Script the syntax tree was parsed from, looked up next to it
pub fn sibling_source(input: &Path) -> Option<PathBuf> {
    let direct = input.with_extension("py");
    if direct.is_file() {
        return Some(direct);
    }
    let stem = output_stem(input);
    let nested = input.with_file_name(format!("{}.py", stem));
    nested.is_file().then_some(nested)
}

/// Load, translate and print one syntax tree
pub fn translate_file(
    input: &Path,
    source: Option<&Path>,
    config: &TranslatorConfig,
) -> Result<Outcome> {
    let mut module = Frontend::load_file(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let source = source.map(Path::to_path_buf).or_else(|| sibling_source(input));
    if let Some(path) = source {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read source {}", path.display()))?;
        let filled = Frontend::attach_source(&mut module, &text);
        debug!("Recovered text of {} nodes from {}", filled, path.display());
    }

    let translation = translate(&module, config);
    let cpp = generate_cpp(&translation.program);
    info!(
        "Translated {} ({} constructs skipped)",
        input.display(),
        translation.diagnostics.len()
    );

    Ok(Outcome {
        input: input.to_path_buf(),
        cpp,
        translation,
    })
}

/// Translate every input, in parallel when there is more than one
pub fn translate_all(
    inputs: &[PathBuf],
    source: Option<&Path>,
    config: &TranslatorConfig,
) -> Result<Vec<Result<Outcome>>> {
    if source.is_some() && inputs.len() > 1 {
        bail!("--source can only be used with a single input");
    }

    let outcomes: Vec<Result<Outcome>> = if inputs.len() > 1 {
        inputs
            .par_iter()
            .map(|input| translate_file(input, None, config))
            .collect()
    } else {
        inputs
            .iter()
            .map(|input| translate_file(input, source, config))
            .collect()
    };
    Ok(outcomes)
}

/// Directory the files generated from `input` are written to
pub fn output_dir<'a>(input: &'a Path, output: Option<&'a Path>) -> &'a Path {
    output
        .or_else(|| input.parent())
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

/// Refuse to run when two inputs would write the same `<stem>.cpp`
pub fn check_output_collisions(inputs: &[PathBuf], output: Option<&Path>) -> Result<()> {
    let mut claimed: HashMap<PathBuf, &PathBuf> = HashMap::new();
    for input in inputs {
        let target = output_dir(input, output).join(format!("{}.cpp", output_stem(input)));
        if let Some(previous) = claimed.insert(target.clone(), input) {
            bail!(
                "{} and {} would both be written to {}",
                previous.display(),
                input.display(),
                target.display()
            );
        }
    }
    Ok(())
}

/// Write `<stem>.cpp` (and `<stem>.diagnostics.json`) into `dir`
pub fn write_outputs(outcome: &Outcome, dir: &Path, diagnostics: bool) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let stem = outcome.stem();
    let cpp_path = dir.join(format!("{}.cpp", stem));
    fs::write(&cpp_path, &outcome.cpp)
        .with_context(|| format!("Failed to write {}", cpp_path.display()))?;
    let mut written = vec![cpp_path];

    if diagnostics {
        let json_path = dir.join(format!("{}.diagnostics.json", stem));
        let json = serde_json::to_string_pretty(&outcome.translation.diagnostics)?;
        fs::write(&json_path, json)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
        written.push(json_path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_stem() {
        assert_eq!(output_stem(Path::new("tests/hello.json")), "hello");
        assert_eq!(output_stem(Path::new("hello.ast.json")), "hello");
        assert_eq!(output_stem(Path::new("dir/plain")), "plain");
        assert_eq!(output_stem(Path::new(".hidden")), ".hidden");
    }

    #[test]
    fn test_source_requires_single_input() {
        let inputs = vec![PathBuf::from("a.json"), PathBuf::from("b.json")];
        let result = translate_all(&inputs, Some(Path::new("a.py")), &TranslatorConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_same_stem_into_one_directory_collides() {
        let inputs = vec![PathBuf::from("a/x.json"), PathBuf::from("b/x.json")];
        assert!(check_output_collisions(&inputs, None).is_ok());

        let err = check_output_collisions(&inputs, Some(Path::new("out"))).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "a/x.json and b/x.json would both be written to {}",
                Path::new("out").join("x.cpp").display()
            )
        );

        let siblings = vec![PathBuf::from("a/x.json"), PathBuf::from("a/x.ast.json")];
        assert!(check_output_collisions(&siblings, None).is_err());
    }

    #[test]
    fn test_output_dir() {
        assert_eq!(output_dir(Path::new("a/x.json"), None), Path::new("a"));
        assert_eq!(output_dir(Path::new("x.json"), None), Path::new("."));
        assert_eq!(output_dir(Path::new("a/x.json"), Some(Path::new("out"))), Path::new("out"));
    }

    #[test]
    fn test_missing_input_is_reported_per_file() {
        let inputs = vec![
            PathBuf::from("/nonexistent/a.json"),
            PathBuf::from("/nonexistent/b.json"),
        ];
        let outcomes = translate_all(&inputs, None, &TranslatorConfig::default()).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.is_err()));
    }
}
