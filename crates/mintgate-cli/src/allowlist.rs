//! # Allowlist Subcommand
//!
//! Offline allowlist tooling. Nothing here touches the collection snapshot.
//!
//! ## Subcommands
//!
//! - `build`: commit a list of `(account, allowance)` pairs to a root and
//!   write a bundle with every account's proof.
//! - `verify`: check one proof against a root.
//! - `proof`: print one account's proof from a bundle.
//!
//! ## Input Formats
//!
//! `build` reads either a JSON array of `{"account", "allowance"}` objects or
//! CSV lines `account,allowance`. Blank lines, `#` comments and a leading
//! `account,allowance` header are skipped in CSV.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use mintgate_core::{AccountId, Count, Hash256};
use mintgate_crypto::{parse_proof, verify_allowance, AllowlistBundle, AllowlistEntry, AllowlistTree};

/// Arguments for the `mintgate allowlist` subcommand.
#[derive(Args, Debug)]
pub struct AllowlistArgs {
    #[command(subcommand)]
    pub command: AllowlistCommand,
}

/// Allowlist subcommands.
#[derive(Subcommand, Debug)]
pub enum AllowlistCommand {
    /// Build the commitment root and a proof bundle.
    Build {
        /// JSON array or CSV file of account/allowance pairs.
        #[arg(long)]
        input: PathBuf,
        /// Where to write the bundle. Printed to stdout if omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Verify a proof against a root.
    Verify {
        /// Commitment root (64 hex chars).
        #[arg(long)]
        root: Hash256,
        /// Account the proof is for.
        #[arg(long)]
        account: AccountId,
        /// Claimed allowance.
        #[arg(long)]
        allowance: Count,
        /// Sibling hashes, leaf level first. Repeat per element.
        #[arg(long = "proof")]
        proof: Vec<String>,
    },

    /// Print one account's proof from a bundle.
    Proof {
        /// Bundle written by `allowlist build`.
        #[arg(long)]
        bundle: PathBuf,
        /// Account to look up.
        #[arg(long)]
        account: AccountId,
    },
}

/// Execute the allowlist subcommand.
pub fn run_allowlist(args: &AllowlistArgs) -> Result<u8> {
    match &args.command {
        AllowlistCommand::Build { input, output } => cmd_build(input, output.as_deref()),
        AllowlistCommand::Verify {
            root,
            account,
            allowance,
            proof,
        } => cmd_verify(root, account, *allowance, proof),
        AllowlistCommand::Proof { bundle, account } => cmd_proof(bundle, account),
    }
}

fn cmd_build(input: &Path, output: Option<&Path>) -> Result<u8> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let entries = parse_entries(&text).with_context(|| format!("in {}", input.display()))?;
    let count = entries.len();

    let tree = AllowlistTree::build(entries)?;
    let bundle = tree.bundle();
    let json = serde_json::to_string_pretty(&bundle)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("OK: committed {count} accounts to {}", path.display());
        }
        None => println!("{json}"),
    }
    println!("root: {}", bundle.root);
    tracing::info!(count, root = %bundle.root, "allowlist built");
    Ok(0)
}

fn cmd_verify(root: &Hash256, account: &AccountId, allowance: Count, proof: &[String]) -> Result<u8> {
    let Some(proof) = parse_proof(proof) else {
        println!("INVALID: proof contains a malformed element");
        return Ok(1);
    };
    if verify_allowance(account, allowance, &proof, root) {
        println!("VALID: {account} may consume up to {allowance}");
        Ok(0)
    } else {
        println!("INVALID: proof does not match root {root}");
        Ok(1)
    }
}

fn cmd_proof(bundle: &Path, account: &AccountId) -> Result<u8> {
    let bundle = load_bundle(bundle)?;
    let Some(entry) = bundle.entry_for(account) else {
        bail!("{account} is not in the bundle");
    };
    println!("allowance: {}", entry.allowance);
    for hash in &entry.proof {
        println!("{hash}");
    }
    Ok(0)
}

/// Read a bundle written by `allowlist build`.
pub fn load_bundle(path: &Path) -> Result<AllowlistBundle> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bundle {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("malformed bundle {}", path.display()))
}

/// Parse allowlist input, auto-detecting JSON by a leading `[`.
pub fn parse_entries(text: &str) -> Result<Vec<AllowlistEntry>> {
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).context("malformed JSON allowlist");
    }

    let mut entries = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((account, allowance)) = line.split_once(',') else {
            bail!("line {}: expected `account,allowance`", lineno + 1);
        };
        let (account, allowance) = (account.trim(), allowance.trim());
        if entries.is_empty() && account.eq_ignore_ascii_case("account") {
            continue;
        }
        entries.push(AllowlistEntry {
            account: AccountId::parse(account).with_context(|| format!("line {}", lineno + 1))?,
            allowance: allowance
                .parse()
                .with_context(|| format!("line {}: invalid allowance {allowance:?}", lineno + 1))?,
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "0x00000000000000000000000000000000000000a1";
    const B: &str = "0x00000000000000000000000000000000000000b2";

    #[test]
    fn parses_csv_with_header_and_comments() {
        let text = format!("account,allowance\n# early access\n{A},2\n\n{B}, 1\n");
        let entries = parse_entries(&text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].account, AccountId::parse(A).unwrap());
        assert_eq!(entries[1].allowance, 1);
    }

    #[test]
    fn parses_json_array() {
        let text = format!(r#"[{{"account":"{A}","allowance":3}}]"#);
        let entries = parse_entries(&text).unwrap();
        assert_eq!(entries[0].allowance, 3);
    }

    #[test]
    fn csv_errors_name_the_line() {
        let err = parse_entries(&format!("{A},2\n{B}\n")).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
        let err = parse_entries(&format!("{A},lots\n")).unwrap_err();
        assert!(format!("{err:#}").contains("invalid allowance"));
    }

    #[test]
    fn build_then_verify_and_extract() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("list.csv");
        let output = dir.path().join("out/bundle.json");
        std::fs::write(&input, format!("{A},2\n{B},1\n")).unwrap();

        assert_eq!(cmd_build(&input, Some(&output)).unwrap(), 0);
        let bundle = load_bundle(&output).unwrap();
        let a = AccountId::parse(A).unwrap();
        let entry = bundle.entry_for(&a).unwrap();
        let proof: Vec<String> = entry.proof.iter().map(Hash256::to_hex).collect();

        assert_eq!(cmd_verify(&bundle.root, &a, 2, &proof).unwrap(), 0);
        assert_eq!(cmd_verify(&bundle.root, &a, 3, &proof).unwrap(), 1);
        assert_eq!(cmd_verify(&bundle.root, &a, 2, &["zz".to_string()]).unwrap(), 1);
        assert_eq!(cmd_proof(&output, &a).unwrap(), 0);
        assert!(cmd_proof(&output, &AccountId::new([9; 20])).is_err());
    }

    #[test]
    fn build_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("list.csv");
        std::fs::write(&input, format!("{A},2\n{A},1\n")).unwrap();
        assert!(cmd_build(&input, None).is_err());
    }
}
