//! Command-line surface (spec.md §6.1). Component: `boxes-cli` front door.
//!
//! The option letters and the ad-hoc per-option grammars (`-a`, `-p`, `-s`,
//! `-t`) are grounded on `examples/original_source/src/cmdline.c`'s
//! `alignment`/`padding`/`size_of_box`/`tab_handling` functions, reworked as
//! small parse functions returning `Result` instead of `optarg`/`errfl`
//! out-parameters. `clap::Parser` replaces the hand-rolled `getopt_long`
//! loop, per the teacher's own `ox-bin::Args` use of `clap::Parser`.

use crate::error::CliError;
use boxes_design::{IndentMode, Padding};
use boxes_generate::{Eol, HAlign, Justify, VAlign};
use boxes_input::TabMode;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "boxes", about = "Draws or removes ASCII/Unicode boxes around text", disable_version_flag = true)]
pub struct Cli {
    /// Alignment/positioning of text inside the box: h{l,c,r} v{t,c,b} j{l,c,r}.
    #[arg(short = 'a', long = "align")]
    pub align: Option<String>,

    /// Ad-hoc single-shape design using `str` as the west shape.
    #[arg(short = 'c', long = "create")]
    pub create: Option<String>,

    /// Force ANSI color sequences on.
    #[arg(long = "color", overrides_with = "no_color")]
    pub color: bool,

    /// Force monochrome output.
    #[arg(long = "no-color", overrides_with = "color")]
    pub no_color: bool,

    /// Box design name (also matches aliases, case-insensitive).
    #[arg(short = 'd', long = "design")]
    pub design: Option<String>,

    /// End-of-line override: CRLF, LF, or CR.
    #[arg(short = 'e', long = "eol")]
    pub eol: Option<String>,

    /// Explicit config file path.
    #[arg(short = 'f', long = "config")]
    pub config: Option<PathBuf>,

    /// Indentation mode: box, text, or none.
    #[arg(short = 'i', long = "indent")]
    pub indent: Option<String>,

    /// Kill leading/trailing blank lines on removal.
    #[arg(short = 'k', long = "kill-blank", overrides_with = "no_kill_blank")]
    pub kill_blank: bool,

    /// Retain leading/trailing blank lines on removal.
    #[arg(long = "no-kill-blank", overrides_with = "kill_blank")]
    pub no_kill_blank: bool,

    /// List available box designs with samples.
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Mend (remove then redraw) the box. Implies `-r`, `-k=false`.
    #[arg(short = 'm', long = "mend")]
    pub mend: bool,

    /// Input/output character encoding override (falls back to the system
    /// encoding with a warning on an unrecognized value).
    #[arg(short = 'n', long = "encoding")]
    pub encoding: Option<String>,

    /// Padding: `([ahvtrbl]n)+`, e.g. `t2l1`.
    #[arg(short = 'p', long = "padding")]
    pub padding: Option<String>,

    /// Query the list of designs by tag: comma list of `[+|-]tag`, `(all)`, `(undoc)`.
    #[arg(short = 'q', long = "tag-query")]
    pub tag_query: Option<String>,

    /// Remove box.
    #[arg(short = 'r', long = "remove")]
    pub remove: bool,

    /// Minimum box size `WxH`.
    #[arg(short = 's', long = "size")]
    pub size: Option<String>,

    /// Tab stop distance and mode: `n[ekus]`.
    #[arg(short = 't', long = "tabs")]
    pub tabs: Option<String>,

    /// Print version information, exit 0.
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// `debug:<area,area,...>` or `(undoc)`.
    #[arg(short = 'x', long = "extra")]
    pub extra: Option<String>,

    /// Input file; `-` or omitted reads stdin.
    pub infile: Option<PathBuf>,
    /// Output file; omitted writes stdout.
    pub outfile: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
pub struct Align {
    pub halign: HAlign,
    pub valign: VAlign,
    pub justify: Justify,
}

/// spec.md §6.1 `-a`: `h{l,c,r}`, `v{t,c,b}`, `j{l,c,r}`; `l`/`r`/`c` alone
/// are shorthand for `j.h.vc`. Unrecognized letters are a usage error.
pub fn parse_align(spec: &str, mut align: Align) -> Result<Align, CliError> {
    let chars: Vec<char> = spec.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i].to_ascii_lowercase();
        let next = chars.get(i + 1).map(|c| c.to_ascii_lowercase());
        match c {
            'h' => {
                align.halign = match next {
                    Some('l') => HAlign::Left,
                    Some('c') => HAlign::Center,
                    Some('r') => HAlign::Right,
                    _ => return Err(bad_align(spec)),
                };
                i += 2;
            }
            'v' => {
                align.valign = match next {
                    Some('t') => VAlign::Top,
                    Some('c') => VAlign::Center,
                    Some('b') => VAlign::Bottom,
                    _ => return Err(bad_align(spec)),
                };
                i += 2;
            }
            'j' => {
                align.justify = match next {
                    Some('l') => Justify::Left,
                    Some('c') => Justify::Center,
                    Some('r') => Justify::Right,
                    _ => return Err(bad_align(spec)),
                };
                i += 2;
            }
            'l' => {
                align = Align { halign: HAlign::Left, valign: VAlign::Center, justify: Justify::Left };
                i += 1;
            }
            'r' => {
                align = Align { halign: HAlign::Right, valign: VAlign::Center, justify: Justify::Right };
                i += 1;
            }
            'c' => {
                align = Align { halign: HAlign::Center, valign: VAlign::Center, justify: Justify::Center };
                i += 1;
            }
            _ => return Err(bad_align(spec)),
        }
    }
    Ok(align)
}

fn bad_align(spec: &str) -> CliError {
    CliError::Usage(format!("Illegal text format -- {spec}"))
}

/// spec.md §6.1 `-p`: `([ahvtrbl]n)+`, applied left-to-right onto `base`.
pub fn parse_padding(spec: &str, mut base: Padding) -> Result<Padding, CliError> {
    let bytes: Vec<char> = spec.chars().collect();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i].to_ascii_lowercase();
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j == i + 1 {
            return Err(bad_padding(spec));
        }
        let n: usize = bytes[i + 1..j].iter().collect::<String>().parse().map_err(|_| bad_padding(spec))?;
        match c {
            'a' => {
                base.top = n;
                base.right = n;
                base.bottom = n;
                base.left = n;
            }
            'h' => {
                base.left = n;
                base.right = n;
            }
            'v' => {
                base.top = n;
                base.bottom = n;
            }
            't' => base.top = n,
            'r' => base.right = n,
            'b' => base.bottom = n,
            'l' => base.left = n,
            _ => return Err(bad_padding(spec)),
        }
        i = j;
    }
    Ok(base)
}

fn bad_padding(spec: &str) -> CliError {
    CliError::Usage(format!("invalid padding specification -- {spec}"))
}

/// spec.md §6.1 `-s`: `WxH`, either half optional, at least one required.
pub fn parse_size(spec: &str) -> Result<(usize, usize), CliError> {
    let lower = spec.to_ascii_lowercase();
    let (w_str, h_str) = match lower.split_once('x') {
        Some((w, h)) => (w, h),
        None => return Err(bad_size(spec)),
    };
    let width = if w_str.is_empty() { 0 } else { w_str.parse().map_err(|_| bad_size(spec))? };
    let height = if h_str.is_empty() { 0 } else { h_str.parse().map_err(|_| bad_size(spec))? };
    if width == 0 && height == 0 {
        return Err(bad_size(spec));
    }
    Ok((width, height))
}

fn bad_size(spec: &str) -> CliError {
    CliError::Usage(format!("invalid box size specification -- {spec}"))
}

/// spec.md §6.1 `-t`: `n[ekus]`, `e`=expand (default), `k`=keep, `u`=unexpand.
pub fn parse_tabs(spec: &str) -> Result<(usize, TabMode), CliError> {
    let end = spec.find(|c: char| !c.is_ascii_digit()).unwrap_or(spec.len());
    let width: usize = spec[..end].parse().map_err(|_| bad_tabs(spec))?;
    if width == 0 || width > 16 {
        return Err(bad_tabs(spec));
    }
    let mode = match &spec[end..] {
        "" | "e" | "E" => TabMode::Expand,
        "k" | "K" => TabMode::Keep,
        "u" | "U" => TabMode::Unexpand,
        _ => return Err(bad_tabs(spec)),
    };
    Ok((width, mode))
}

fn bad_tabs(spec: &str) -> CliError {
    CliError::Usage(format!("invalid tab handling specification -- {spec}"))
}

/// spec.md §6.1 `-e`, case-insensitive.
pub fn parse_eol(spec: &str) -> Result<Eol, CliError> {
    match spec.to_ascii_uppercase().as_str() {
        "CRLF" => Ok(Eol::CrLf),
        "LF" => Ok(Eol::Lf),
        "CR" => Ok(Eol::Cr),
        _ => Err(CliError::Usage(format!("invalid eol spec -- {spec}"))),
    }
}

/// spec.md §6.1 `-i`.
pub fn parse_indent(spec: &str) -> Result<IndentMode, CliError> {
    IndentMode::from_name(spec).ok_or_else(|| CliError::Usage("invalid indentation mode".to_string()))
}

#[derive(Debug, Clone)]
pub enum ExtraArg {
    Debug(Vec<String>),
    Undoc,
}

/// spec.md §6.1 `-x`: `debug:<area,area,...>` or the undocumented literal.
pub fn parse_extra(spec: &str) -> Result<ExtraArg, CliError> {
    if spec == "(undoc)" {
        return Ok(ExtraArg::Undoc);
    }
    if let Some(rest) = spec.strip_prefix("debug:") {
        let areas = rest
            .split(',')
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        return Ok(ExtraArg::Debug(areas));
    }
    Err(CliError::Usage(format!("invalid argument to -x -- {spec}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_align() -> Align {
        Align { halign: HAlign::Center, valign: VAlign::Center, justify: Justify::Left }
    }

    #[test]
    fn align_shorthand_l_sets_left_justify_and_halign() {
        let a = parse_align("l", default_align()).unwrap();
        assert_eq!(a.halign, HAlign::Left);
        assert_eq!(a.justify, Justify::Left);
    }

    #[test]
    fn align_explicit_letters_compose() {
        let a = parse_align("hrvtjc", default_align()).unwrap();
        assert_eq!(a.halign, HAlign::Right);
        assert_eq!(a.valign, VAlign::Top);
        assert_eq!(a.justify, Justify::Center);
    }

    #[test]
    fn align_rejects_unknown_letter() {
        assert!(parse_align("z", default_align()).is_err());
    }

    #[test]
    fn padding_all_then_override_one_side() {
        let p = parse_padding("a2l5", Padding::default()).unwrap();
        assert_eq!(p, Padding { top: 2, right: 2, bottom: 2, left: 5 });
    }

    #[test]
    fn size_requires_at_least_one_dimension() {
        assert!(parse_size("x").is_err());
        assert_eq!(parse_size("10x20").unwrap(), (10, 20));
        assert_eq!(parse_size("10x").unwrap(), (10, 0));
    }

    #[test]
    fn tabs_parses_width_and_mode() {
        assert_eq!(parse_tabs("4k").unwrap(), (4, TabMode::Keep));
        assert_eq!(parse_tabs("8").unwrap(), (8, TabMode::Expand));
        assert!(parse_tabs("0").is_err());
        assert!(parse_tabs("17").is_err());
    }

    #[test]
    fn extra_parses_debug_areas() {
        match parse_extra("debug:Generate, Detect").unwrap() {
            ExtraArg::Debug(areas) => assert_eq!(areas, vec!["generate", "detect"]),
            _ => panic!("expected debug areas"),
        }
    }
}
