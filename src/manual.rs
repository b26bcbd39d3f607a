//! Manual conversion: run the external converter, locate the manual's
//! entry page and mirror the assets its pages reference.

use crate::assets::{self, AssetClass, MirrorReport};
use crate::config::ManualOptions;
use crate::error::{Error, Result};
use crate::template::{self, Params};
use crate::tree::ensure_dir;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Exit status a shell reports for a command it cannot find.
const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// Result of a successful manual build.
#[derive(Debug, Clone)]
pub struct ManualBuild {
    /// Entry page, relative to the manual output directory.
    pub root: PathBuf,
    pub pages: Vec<PathBuf>,
    pub assets: MirrorReport,
}

/// Run the converter on `source`, writing HTML into `outdir`.
pub fn convert(options: &ManualOptions, source: &Path, outdir: &Path) -> Result<()> {
    let params = Params::from([
        ("outdir", outdir.to_string_lossy().into_owned()),
        ("source", source.to_string_lossy().into_owned()),
    ]);
    let args: Vec<String> = options
        .args
        .iter()
        .map(|arg| template::expand(arg, &params))
        .collect();

    info!("converting manual {}", source.display());
    debug!("running {} {}", options.program, args.join(" "));

    let output = Command::new(&options.program)
        .args(&args)
        .output()
        .map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                Error::ToolNotFound {
                    program: options.program.clone(),
                }
            } else {
                Error::Spawn {
                    program: options.program.clone(),
                    source,
                }
            }
        })?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if output.status.success() {
        if !stderr.trim().is_empty() {
            debug!("{}: {}", options.program, stderr.trim());
        }
        return Ok(());
    }

    if !stderr.trim().is_empty() {
        warn!("{}: {}", options.program, stderr.trim());
    }
    match output.status.code() {
        Some(EXIT_COMMAND_NOT_FOUND) => Err(Error::ToolNotFound {
            program: options.program.clone(),
        }),
        code => Err(Error::ConverterFailed {
            program: options.program.clone(),
            // killed by a signal
            code: code.unwrap_or(-1),
        }),
    }
}

/// HTML files directly inside `dir`, sorted.
pub fn html_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.html", glob::Pattern::escape(&dir.to_string_lossy()));
    let paths = glob::glob(&pattern).map_err(|e| Error::ReadFile {
        path: dir.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, e.to_string()),
    })?;
    let mut files: Vec<PathBuf> = paths
        .filter_map(|p| p.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Pick the manual's entry page: `index.html`, else `<stem>.html`, else the
/// only HTML file present.
pub fn find_root(outdir: &Path, stem: &str) -> Result<PathBuf> {
    for candidate in ["index.html".to_string(), format!("{stem}.html")] {
        if outdir.join(&candidate).is_file() {
            return Ok(PathBuf::from(candidate));
        }
    }

    let files = html_files(outdir)?;
    match files.as_slice() {
        [only] => Ok(only
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| only.clone())),
        _ => Err(Error::ManualRoot {
            dir: outdir.to_path_buf(),
        }),
    }
}

/// Convert the manual at `doc_dir/<source>` into `outdir` and mirror the
/// images and stylesheets its pages reference.
pub fn build(options: &ManualOptions, doc_dir: &Path, outdir: &Path) -> Result<Option<ManualBuild>> {
    let Some(rel) = options.source.as_deref() else {
        debug!("no manual source configured");
        return Ok(None);
    };

    let source = doc_dir.join(rel);
    if !source.is_file() {
        return Err(Error::ReadFile {
            path: source,
            source: io::Error::new(io::ErrorKind::NotFound, "manual source not found"),
        });
    }
    let source_root = source.parent().unwrap_or(doc_dir).to_path_buf();
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    ensure_dir(outdir)?;
    convert(options, &source, outdir)?;
    let root = find_root(outdir, &stem)?;

    let pages = html_files(outdir)?;
    let mut report = MirrorReport::default();
    for page in &pages {
        report.merge(assets::mirror(page, &AssetClass::ALL, &source_root, outdir)?);
    }
    info!(
        "manual: {} page(s), {} asset(s) copied",
        pages.len(),
        report.copied.len()
    );

    Ok(Some(ManualBuild {
        root,
        pages,
        assets: report,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn shell(script: &str) -> ManualOptions {
        ManualOptions {
            source: Some("geometry.texi".to_string()),
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                script.to_string(),
                "sh".to_string(),
                "${outdir}".to_string(),
                "${source}".to_string(),
            ],
        }
    }

    fn doc_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("doc")).unwrap();
        fs::write(dir.path().join("doc/geometry.texi"), "@node Top\n").unwrap();
        for (rel, text) in files {
            let path = dir.path().join("doc").join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, text).unwrap();
        }
        dir
    }

    #[test]
    fn root_prefers_index_then_stem_then_single() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("only.html"), "").unwrap();
        assert_eq!(find_root(dir.path(), "geometry").unwrap(), PathBuf::from("only.html"));

        fs::write(dir.path().join("geometry.html"), "").unwrap();
        assert_eq!(
            find_root(dir.path(), "geometry").unwrap(),
            PathBuf::from("geometry.html")
        );

        fs::write(dir.path().join("index.html"), "").unwrap();
        assert_eq!(find_root(dir.path(), "geometry").unwrap(), PathBuf::from("index.html"));
    }

    #[test]
    fn ambiguous_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.html"), "").unwrap();
        fs::write(dir.path().join("b.html"), "").unwrap();
        let err = find_root(dir.path(), "geometry").unwrap_err();
        assert!(err
            .to_string()
            .contains("unable to determine the root of the HTML manual"));
    }

    #[test]
    fn empty_output_is_fatal() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            find_root(dir.path(), "geometry"),
            Err(Error::ManualRoot { .. })
        ));
    }

    #[test]
    fn no_source_configured_is_skipped() {
        let dir = TempDir::new().unwrap();
        let options = ManualOptions::default();
        assert!(build(&options, dir.path(), &dir.path().join("out"))
            .unwrap()
            .is_none());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn missing_source_is_fatal() {
        let dir = TempDir::new().unwrap();
        let options = ManualOptions {
            source: Some("absent.texi".to_string()),
            ..ManualOptions::default()
        };
        assert!(matches!(
            build(&options, dir.path(), &dir.path().join("out")),
            Err(Error::ReadFile { .. })
        ));
    }

    #[test]
    fn missing_program_is_tool_not_found() {
        let dir = doc_dir(&[]);
        let options = ManualOptions {
            program: "pkgdoc-no-such-converter".to_string(),
            ..shell("")
        };
        let err = build(&options, &dir.path().join("doc"), &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }), "{err}");
    }

    #[test]
    fn exit_127_is_tool_not_found() {
        let dir = doc_dir(&[]);
        let err = build(&shell("exit 127"), &dir.path().join("doc"), &dir.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }), "{err}");
    }

    #[test]
    fn nonzero_exit_reports_code() {
        let dir = doc_dir(&[]);
        let err = build(&shell("exit 3"), &dir.path().join("doc"), &dir.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, Error::ConverterFailed { code: 3, .. }), "{err}");
    }

    #[test]
    fn converts_and_mirrors_assets() {
        let dir = doc_dir(&[("img/fig.png", "png"), ("manual.css", "css")]);
        let script = r#"printf '<link rel="stylesheet" href="manual.css"><img src="img/fig.png"><img src="../x.png">' > "$1/geometry.html""#;
        let out = dir.path().join("out");

        let manual = build(&shell(script), &dir.path().join("doc"), &out)
            .unwrap()
            .unwrap();

        assert_eq!(manual.root, PathBuf::from("geometry.html"));
        assert_eq!(manual.pages, vec![out.join("geometry.html")]);
        assert_eq!(fs::read_to_string(out.join("img/fig.png")).unwrap(), "png");
        assert_eq!(fs::read_to_string(out.join("manual.css")).unwrap(), "css");
        assert_eq!(manual.assets.rejected, ["../x.png"]);
    }

    #[test]
    fn object_reference_is_mirrored_once() {
        let dir = doc_dir(&[("fig/b.svg", "svg")]);
        let script = r#"printf '<object data="fig/b.svg"></object><object data="../up.svg"></object>' > "$1/index.html""#;
        let out = dir.path().join("out");

        let manual = build(&shell(script), &dir.path().join("doc"), &out)
            .unwrap()
            .unwrap();

        assert_eq!(manual.assets.copied, vec![out.join("fig/b.svg")]);
        assert_eq!(manual.assets.rejected, ["../up.svg"]);
    }

    #[test]
    fn latin1_manual_is_not_fatal() {
        let dir = doc_dir(&[("img/fig.png", "png")]);
        let script = r#"printf '<p>Caf\351</p><img src="img/fig.png">' > "$1/index.html""#;
        let out = dir.path().join("out");

        let manual = build(&shell(script), &dir.path().join("doc"), &out)
            .unwrap()
            .unwrap();

        assert!(fs::read_to_string(out.join("index.html")).is_err());
        assert_eq!(manual.assets.copied, vec![out.join("img/fig.png")]);
    }
}
