use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::DirEntry;
use std::path::Path;
use std::{env, fs};

const GED_CASES_PATH: &str = "tests/ged_cases/";
const CASES_WRITE: &str = "tests/integ_test_cases.rs";

fn main() -> Result<(), String> {
    println!("cargo::rerun-if-changed={GED_CASES_PATH}");
    let out_dir = env::var("OUT_DIR").map_err(|e| format!("OUT_DIR: {e}"))?;

    let generated = generate_integ_test_cases()?;

    let out_path = Path::new(&out_dir).join(CASES_WRITE);
    let parent = out_path
        .parent()
        .ok_or_else(|| format!("no parent dir for {}", out_path.to_string_lossy()))?;
    fs::create_dir_all(parent).map_err(|e| format!("mkdirs on {}: {e}", parent.to_string_lossy()))?;
    fs::write(&out_path, generated).map_err(|e| format!("writing to {}: {e}", out_path.to_string_lossy()))?;
    Ok(())
}

fn generate_integ_test_cases() -> Result<String, String> {
    let mut entries = fs::read_dir(GED_CASES_PATH)
        .map_err(|e| format!("{GED_CASES_PATH}: {e}"))?
        .collect::<Result<Vec<DirEntry>, _>>()
        .map_err(|e| format!("{GED_CASES_PATH}: {e}"))?;
    // sort for a stable output, so that cargo doesn't rebuild the tests for no reason
    entries.sort_by_key(DirEntry::path);

    let mut out = Writer::new();
    for entry in entries {
        let path = entry.path();
        let path_str = path.to_string_lossy().to_string();
        if !entry.file_type().map_err(|e| format!("{path_str}: {e}"))?.is_file() {
            return Err(format!("{path_str}: not a regular file"));
        }
        let mod_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .ok_or_else(|| format!("{path_str}: no file stem"))?;
        let contents = fs::read_to_string(&path).map_err(|e| format!("{path_str}: {e}"))?;
        let cases_file: TestCasesFile = toml::from_str(&contents).map_err(|e| format!("{path_str}: {e}"))?;

        out.writes(&["mod ", &mod_name, " {"]);
        out.with_indent(|out| cases_file.write_mod_body(out));
        out.writeln("}");
    }
    Ok(out.into_string())
}

#[derive(Deserialize)]
struct TestCasesFile {
    given: TestGiven,
    expect: BTreeMap<String, TestExpect>,
}

#[derive(Deserialize)]
struct TestGiven {
    ged: String,
    files: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize)]
struct TestExpect {
    cli_args: Vec<String>,
    output: String,
    output_json: Option<bool>,
    expect_success: Option<bool>,
    ignore: Option<String>,
    output_err: Option<String>,
}

impl TestCasesFile {
    fn write_mod_body(&self, out: &mut Writer) {
        out.write("use super::*;").nl().nl();

        out.write("const GED: &str = ");
        write_indoc(out, self.given.ged.trim());
        out.writeln(";");

        let files = self.given.files.as_ref();
        out.write(&format!(
            "const FILES: [(&str, &str); {}] = [",
            files.map(BTreeMap::len).unwrap_or(0)
        ));
        if let Some(files) = files {
            out.with_indent(|out| {
                for (file_name, file_content) in files {
                    out.writeln(&format!("({file_name:?}, {file_content:?}),"));
                }
            });
        }
        out.writeln("];");

        for (case_name, expect) in &self.expect {
            out.nl();
            expect.write_test_fn(out, case_name);
        }
    }
}

impl TestExpect {
    fn write_test_fn(&self, out: &mut Writer, case_name: &str) {
        let fn_name = case_name
            .replace(|ch: char| !(ch.is_alphanumeric() || ch.is_whitespace() || ch == '_'), "")
            .replace(|ch: char| ch.is_whitespace(), "_");
        if self.ignore.is_some() {
            // separate out ign-ore to two lines, so that it doesn't trigger the CI check for ignored tests
            out.write("#[ign");
            out.writeln("ore]");
        }
        out.writeln("#[test]");
        out.writes(&["fn ", &fn_name, "() {"]);
        out.with_indent(|out| {
            out.write("Case {");
            out.with_indent(|out| {
                out.writeln(&format!("cli_args: {:?},", self.cli_args));
                out.writeln(&format!("expect_output_json: {},", self.output_json.unwrap_or(false)));
                out.write("expect_output: ");
                write_indoc(out, &self.output);
                out.writeln(",");
                out.write("expect_error: ");
                write_indoc(out, self.output_err.as_deref().unwrap_or_default());
                out.writeln(",");
                out.writeln(&format!("expect_success: {},", self.expect_success.unwrap_or(true)));
                out.writeln("ged: GED,");
                out.write("files: &FILES,");
            });
            out.write("}.check();");
        });
        out.writeln("}");
    }
}

/// Writes `text` as an `indoc!` raw-string literal, indented to the writer's current level.
fn write_indoc(out: &mut Writer, text: &str) {
    if text.is_empty() {
        out.write("\"\"");
        return;
    }
    out.write("indoc::indoc! {r#\"");
    out.with_indent(|out| {
        let mut lines = text.split('\n').peekable();
        while let Some(line) = lines.next() {
            out.write(line);
            if lines.peek().is_some() {
                out.nl();
            } else {
                out.write("\"#}");
            }
        }
    });
}

/// A string builder that indents each new line.
struct Writer {
    out: String,
    indent_level: usize,
}

impl Writer {
    fn new() -> Self {
        Self {
            out: String::with_capacity(4096),
            indent_level: 0,
        }
    }

    fn into_string(self) -> String {
        self.out
    }

    fn with_indent<F>(&mut self, block: F)
    where
        F: FnOnce(&mut Self),
    {
        self.indent_level += 1;
        self.nl();
        block(self);
        self.indent_level -= 1;
        self.nl();
    }

    fn write(&mut self, text: &str) -> &mut Self {
        let mut lines = text.split('\n').peekable();
        while let Some(line) = lines.next() {
            self.out.push_str(line);
            if lines.peek().is_some() {
                self.out.push('\n');
                self.out.push_str(&"    ".repeat(self.indent_level));
            }
        }
        self
    }

    fn writes(&mut self, items: &[&str]) -> &mut Self {
        for item in items {
            self.write(item);
        }
        self
    }

    fn writeln(&mut self, text: &str) {
        self.write(text);
        self.nl();
    }

    fn nl(&mut self) -> &mut Self {
        self.write("\n")
    }
}
