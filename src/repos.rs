//! Vendor repository download.
//!
//! The border router example lives in Espressif's `esp-thread-br`
//! repository. Rather than requiring git, the wizard downloads the
//! GitHub branch tarball, extracts it into a staging directory, and
//! moves the checkout into place under `~/esp`.

use anyhow::{anyhow, bail, Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::paths;

const GITHUB_BASE: &str = "https://github.com";

/// A repository the setup needs checked out locally.
pub struct RepoSpec {
    pub name: &'static str,
    pub github_repo: &'static str,
    pub branch: &'static str,
}

pub const REQUIRED_REPOS: &[RepoSpec] = &[RepoSpec {
    name: "esp-thread-br",
    github_repo: "espressif/esp-thread-br",
    branch: "main",
}];

fn archive_url(spec: &RepoSpec) -> String {
    format!(
        "{}/{}/archive/refs/heads/{}.tar.gz",
        GITHUB_BASE, spec.github_repo, spec.branch
    )
}

/// Download (or refresh) all required repositories.
pub async fn download_repositories(skip: bool) -> Result<()> {
    if skip {
        println!("\n=== Skipping repository download (using existing checkouts) ===");
        return Ok(());
    }

    println!("\n=== Downloading repositories ===");

    let esp_dir = paths::esp_dir()?;
    std::fs::create_dir_all(&esp_dir)
        .with_context(|| format!("Failed to create {}", esp_dir.display()))?;

    let client = reqwest::Client::builder()
        .user_agent("esp-thread-setup")
        .build()
        .context("Failed to create HTTP client")?;

    for spec in REQUIRED_REPOS {
        let target = esp_dir.join(spec.name);

        if target.exists() {
            println!("Repository {} already exists at {}", spec.name, target.display());
            let refresh = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("Re-download and update {}?", spec.name))
                .default(false)
                .interact()?;
            if !refresh {
                continue;
            }
            std::fs::remove_dir_all(&target)
                .with_context(|| format!("Failed to remove {}", target.display()))?;
        }

        fetch_repo(&client, spec, &target).await?;
        println!("✔ Downloaded and extracted {}", spec.name);
    }

    println!("✔ All repositories downloaded");
    Ok(())
}

async fn fetch_repo(client: &reqwest::Client, spec: &RepoSpec, target: &Path) -> Result<()> {
    let url = archive_url(spec);
    println!("Downloading {} from {url}...", spec.name);

    let staging = tempfile::tempdir().context("Failed to create staging directory")?;
    let archive_path = staging.path().join(format!("{}.tar.gz", spec.name));

    download_file(client, &url, &archive_path).await?;
    extract_tarball(&archive_path, staging.path())?;

    let extracted = extracted_root(staging.path(), &archive_path)?;
    std::fs::rename(&extracted, target).or_else(|_| {
        // Cross-device staging dir; fall back to a copy.
        copy_tree(&extracted, target)
    })?;

    Ok(())
}

/// Stream a download to disk with a progress bar.
async fn download_file(client: &reqwest::Client, url: &str, dest: &Path) -> Result<()> {
    let response = client
        .get(url)
        .send()
        .await
        .context("Failed to start download")?
        .error_for_status()
        .context("Download request failed")?;

    let total_size = response.content_length().unwrap_or(0);

    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .expect("static progress template")
            .progress_chars("#>-"),
    );

    let mut file = std::fs::File::create(dest).context("Failed to create download file")?;
    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Failed to read download chunk")?;
        file.write_all(&chunk).context("Failed to write download chunk")?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    pb.finish_with_message("Downloaded");
    Ok(())
}

fn extract_tarball(archive: &Path, dest: &Path) -> Result<()> {
    let file = std::fs::File::open(archive)
        .with_context(|| format!("Failed to open {}", archive.display()))?;
    let decoder = flate2::read::GzDecoder::new(file);
    let mut tar = tar::Archive::new(decoder);
    tar.unpack(dest).context("Failed to extract archive")?;
    Ok(())
}

/// GitHub tarballs wrap everything in a single `repo-branch/` directory;
/// find it among the staging dir entries.
fn extracted_root(staging: &Path, archive: &Path) -> Result<PathBuf> {
    let dirs: Vec<PathBuf> = std::fs::read_dir(staging)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir() && p.as_path() != archive)
        .collect();

    match dirs.as_slice() {
        [single] => Ok(single.clone()),
        [] => bail!("No directories found in the extracted archive"),
        many => many
            .iter()
            .find(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| !n.starts_with("__MACOSX"))
            })
            .cloned()
            .ok_or_else(|| anyhow!("Could not identify extracted repository root")),
    }
}

fn copy_tree(src: &Path, dest: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let to = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &to)?;
        } else {
            std::fs::copy(entry.path(), &to)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_url_points_at_branch_tarball() {
        let spec = &REQUIRED_REPOS[0];
        assert_eq!(
            archive_url(spec),
            "https://github.com/espressif/esp-thread-br/archive/refs/heads/main.tar.gz"
        );
    }

    #[test]
    fn extracted_root_finds_single_directory() {
        let staging = tempfile::tempdir().unwrap();
        let archive = staging.path().join("x.tar.gz");
        std::fs::write(&archive, b"").unwrap();
        std::fs::create_dir(staging.path().join("esp-thread-br-main")).unwrap();

        let root = extracted_root(staging.path(), &archive).unwrap();
        assert!(root.ends_with("esp-thread-br-main"));
    }

    #[test]
    fn extracted_root_skips_macosx_metadata() {
        let staging = tempfile::tempdir().unwrap();
        let archive = staging.path().join("x.tar.gz");
        std::fs::write(&archive, b"").unwrap();
        std::fs::create_dir(staging.path().join("__MACOSX")).unwrap();
        std::fs::create_dir(staging.path().join("esp-thread-br-main")).unwrap();

        let root = extracted_root(staging.path(), &archive).unwrap();
        assert!(root.ends_with("esp-thread-br-main"));
    }

    #[test]
    fn extracted_root_errors_on_empty_staging() {
        let staging = tempfile::tempdir().unwrap();
        let archive = staging.path().join("x.tar.gz");
        std::fs::write(&archive, b"").unwrap();
        assert!(extracted_root(staging.path(), &archive).is_err());
    }

    #[test]
    fn copy_tree_copies_nested_files() {
        let src = tempfile::tempdir().unwrap();
        std::fs::create_dir(src.path().join("sub")).unwrap();
        std::fs::write(src.path().join("a.txt"), "a").unwrap();
        std::fs::write(src.path().join("sub/b.txt"), "b").unwrap();

        let dest = tempfile::tempdir().unwrap();
        let target = dest.path().join("copy");
        copy_tree(src.path(), &target).unwrap();

        assert_eq!(std::fs::read_to_string(target.join("a.txt")).unwrap(), "a");
        assert_eq!(std::fs::read_to_string(target.join("sub/b.txt")).unwrap(), "b");
    }
}
