//! Orchestration: catalog load, design resolution, option merging, and the
//! draw/remove/mend pipelines (spec.md §4.3, §4.9, §4.10, §6.1).
//!
//! Grounded on `examples/original_source/src/boxes.c`'s `main` for the
//! overall phase order (config parsing, design selection, then one of
//! draw/remove/mend) and on the teacher's `ox_bin::AppStartup` for
//! separating option parsing, setup, and the run itself into distinct
//! functions.

use std::io::{BufReader, Write};
use std::path::Path;

use boxes_design::{Catalog, Design, IndentMode};
use boxes_generate::{generate, Eol, GenerateOptions, HAlign, Justify, VAlign};
use boxes_input::{Input, ReadOptions, TabMode};
use boxes_remove::{remove, RemoveOptions};

use crate::adhoc;
use crate::args::{parse_align, parse_eol, parse_indent, parse_padding, parse_size, parse_tabs, Align, Cli};
use crate::error::CliError;

pub struct Outcome {
    pub text: String,
}

pub fn run(cli: &Cli) -> Result<Outcome, CliError> {
    let (catalog, config_errors) = Catalog::load(cli.config.as_deref())?;
    if catalog.is_empty() && !config_errors.is_empty() {
        return Err(CliError::config(config_errors));
    }
    for err in &config_errors {
        tracing::warn!(target: "config", "{err}");
    }

    let (tab_stop, tab_mode) = match &cli.tabs {
        Some(spec) => parse_tabs(spec)?,
        None => (8, TabMode::Expand),
    };
    let read_opts = ReadOptions { tab_stop, tab_mode, max_line_bytes: boxes_input::DEFAULT_MAX_LINE_BYTES };

    resolve_encoding(cli.encoding.as_deref());

    let removing = cli.remove || cli.mend;
    let mut input = read_input(cli.infile.as_deref(), &read_opts)?;

    let design: Design = resolve_design(cli, &catalog, &input, removing)?;

    let indent = match &cli.indent {
        Some(spec) => parse_indent(spec)?,
        None => design.indent,
    };

    let text = if removing {
        let kill_blank = !cli.mend && !cli.no_kill_blank && cli.kill_blank;
        let remove_opts = RemoveOptions { kill_blank, mend: cli.mend, indent };
        let mut unboxed = remove(&design, &input, &remove_opts)?;
        if cli.mend {
            unboxed.strip_common_indent(indent, false);
            unboxed.apply_rules(&design.replace_rules)?;
            generate_text(&design, &unboxed, indent, cli, tab_stop, tab_mode)?
        } else {
            render_plain(&unboxed)
        }
    } else {
        input.strip_common_indent(indent, false);
        input.apply_rules(&design.replace_rules)?;
        generate_text(&design, &input, indent, cli, tab_stop, tab_mode)?
    };

    Ok(Outcome { text })
}

/// `-d`, then `-c`, then (remove/mend only) autodetection, then the
/// catalog's first design as the draw-mode default.
fn resolve_design(cli: &Cli, catalog: &Catalog, input: &Input, removing: bool) -> Result<Design, CliError> {
    if let Some(name) = &cli.design {
        return catalog
            .by_name(name)
            .cloned()
            .ok_or_else(|| CliError::DesignSelection(format!("Unknown design \"{name}\"")));
    }
    if let Some(text) = &cli.create {
        return adhoc::build(text);
    }
    if removing {
        return boxes_detect::detect(catalog, input).cloned().ok_or(CliError::Autodetect);
    }
    catalog
        .iter()
        .next()
        .cloned()
        .ok_or_else(|| CliError::config(Vec::new()))
}

fn generate_text(
    design: &Design,
    input: &Input,
    indent: IndentMode,
    cli: &Cli,
    tab_stop: usize,
    tab_mode: TabMode,
) -> Result<String, CliError> {
    let mut align = Align { halign: HAlign::Center, valign: VAlign::Center, justify: Justify::Left };
    if let Some(spec) = &cli.align {
        align = parse_align(spec, align)?;
    }

    let mut padding = design.padding;
    if let Some(spec) = &cli.padding {
        padding = parse_padding(spec, padding)?;
    }

    let (min_width, min_height) = match &cli.size {
        Some(spec) => parse_size(spec)?,
        None => (0, 0),
    };

    let eol = match &cli.eol {
        Some(spec) => parse_eol(spec)?,
        None => Eol::Lf,
    };

    let opts = GenerateOptions {
        halign: align.halign,
        valign: align.valign,
        justify: align.justify,
        eol,
        indent,
        padding,
        min_width,
        min_height,
        tab_stop,
        tab_mode,
    };

    Ok(generate(design, input, &opts)?)
}

const SUPPORTED_ENCODINGS: &[&str] = &["utf-8", "utf8"];

/// spec.md §6.5: the internal representation is always UTF-32 (here, Rust
/// `char`s decoded from UTF-8). An unrecognized `-n` value doesn't abort the
/// run; it falls back to the system encoding (UTF-8) with a warning, since
/// this codebase has no transcoding crate to honor any other encoding name.
/// Returns whether a fallback warning was emitted (for tests).
fn resolve_encoding(requested: Option<&str>) -> bool {
    match requested {
        Some(enc) if !SUPPORTED_ENCODINGS.contains(&enc.to_ascii_lowercase().as_str()) => {
            tracing::warn!(target: "input", requested = enc, "unrecognized encoding, falling back to the system encoding (UTF-8)");
            true
        }
        _ => false,
    }
}

/// Render the unboxed text alone (remove-only run, no redraw).
fn render_plain(input: &Input) -> String {
    let mut out = String::new();
    for line in &input.lines {
        out.push_str(&line.text.to_text());
        out.push('\n');
    }
    if !input.final_newline && out.ends_with('\n') {
        out.pop();
    }
    out
}

fn read_input(infile: Option<&Path>, opts: &ReadOptions) -> Result<Input, CliError> {
    let use_stdin = infile.map(|p| p == Path::new("-")).unwrap_or(true);
    if use_stdin {
        let stdin = std::io::stdin();
        Input::read(stdin.lock(), opts).map_err(CliError::from)
    } else {
        let path = infile.unwrap();
        let file = std::fs::File::open(path).map_err(|e| CliError::OpenInput { path: path.to_path_buf(), source: e })?;
        Input::read(BufReader::new(file), opts).map_err(CliError::from)
    }
}

pub fn write_output(outfile: Option<&Path>, text: &str) -> Result<(), CliError> {
    match outfile {
        None => std::io::stdout().write_all(text.as_bytes()).map_err(CliError::Io),
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .map_err(|e| CliError::OpenOutput { path: path.to_path_buf(), source: e })?;
            file.write_all(text.as_bytes()).map_err(CliError::Io)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_encoding_accepts_utf8_silently() {
        assert!(!resolve_encoding(Some("utf-8")));
        assert!(!resolve_encoding(Some("UTF8")));
        assert!(!resolve_encoding(None));
    }

    #[test]
    fn resolve_encoding_warns_and_falls_back_on_unknown_value() {
        assert!(resolve_encoding(Some("shift-jis")));
    }
}
