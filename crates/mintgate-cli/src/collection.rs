//! # Collection Subcommands
//!
//! Create a collection snapshot and run owner operations against it.
//!
//! ## Subcommands
//!
//! - `init`: build a fresh engine from a collection YAML.
//! - `status`: print the engine summary as JSON.
//! - `admin`: phase switches, reveal, base URI, root, royalty receiver,
//!   airdrop and withdraw.
//!
//! The snapshot holds the administrative capability, so whoever can write
//! the state file is the owner.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use mintgate_core::{AccountId, CollectionConfig, Hash256, IssuanceError};
use mintgate_state::{IssuanceEngine, SnapshotStore};

use crate::{report_rejection, Session};

/// Arguments for `mintgate init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Collection YAML.
    #[arg(long)]
    pub config: PathBuf,
}

/// Arguments for `mintgate admin`.
#[derive(Args, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// `--enable` / `--disable`.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct IssuanceSwitch {
    #[arg(long)]
    pub enable: bool,
    #[arg(long)]
    pub disable: bool,
}

/// `--open` / `--close`.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SaleSwitch {
    #[arg(long)]
    pub open: bool,
    #[arg(long)]
    pub close: bool,
}

/// Owner subcommands.
#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Enable or disable all non-administrative issuance.
    Issuance(IssuanceSwitch),

    /// Open or close the public sale.
    PublicSale(SaleSwitch),

    /// Reveal per-item metadata. Cannot be undone.
    Reveal,

    /// Replace the metadata base URI.
    BaseUri {
        /// New base URI.
        uri: String,
    },

    /// Install a new allowlist root.
    Root {
        /// Commitment root (64 hex chars).
        root: Hash256,
    },

    /// Replace the royalty receiver.
    RoyaltyReceiver {
        /// Receiving account.
        account: AccountId,
    },

    /// Issue one item to each recipient, free of charge.
    Airdrop {
        /// Recipient accounts.
        #[arg(required = true)]
        recipients: Vec<AccountId>,
    },

    /// Release collected proceeds.
    Withdraw,
}

/// Execute `mintgate init`.
pub fn run_init(args: &InitArgs, state: &Path) -> Result<u8> {
    let config = CollectionConfig::from_path(&args.config)?;
    let (engine, _) = IssuanceEngine::from_config(&config);
    let store = SnapshotStore::new(state);
    let _lock = store.lock()?;
    store
        .create(&engine.snapshot())
        .with_context(|| format!("cannot initialize {}", state.display()))?;

    println!(
        "OK: created collection {} ({}) at {}",
        config.name,
        config.symbol,
        state.display()
    );
    Ok(0)
}

/// Execute `mintgate status`.
pub fn run_status(state: &Path) -> Result<u8> {
    let session = Session::open(state)?;
    println!("{}", serde_json::to_string_pretty(&session.engine.status())?);
    Ok(0)
}

/// Execute `mintgate admin`.
pub fn run_admin(args: &AdminArgs, state: &Path) -> Result<u8> {
    let mut session = Session::open(state)?;
    let Session { engine, admin, .. } = &mut session;

    let outcome: Result<String, IssuanceError> = match &args.command {
        AdminCommand::Issuance(switch) => engine
            .set_issuance_enabled(admin, switch.enable)
            .map(|()| format!("issuance {}", if switch.enable { "enabled" } else { "disabled" })),
        AdminCommand::PublicSale(switch) => engine
            .set_public_sale_open(admin, switch.open)
            .map(|()| format!("public sale {}", if switch.open { "open" } else { "closed" })),
        AdminCommand::Reveal => engine.reveal(admin).map(|()| "metadata revealed".to_string()),
        AdminCommand::BaseUri { uri } => engine
            .set_base_uri(admin, uri.as_str())
            .map(|()| format!("base URI set to {uri:?}")),
        AdminCommand::Root { root } => engine
            .set_allowlist_root(admin, *root)
            .map(|()| format!("allowlist root set to {root}")),
        AdminCommand::RoyaltyReceiver { account } => engine
            .set_royalty_receiver(admin, *account)
            .map(|()| format!("royalty receiver set to {account}")),
        AdminCommand::Airdrop { recipients } => engine.airdrop(admin, recipients).map(|ids| {
            let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
            format!("airdropped ids {}", ids.join(", "))
        }),
        AdminCommand::Withdraw => engine
            .withdraw(admin)
            .map(|amount| format!("withdrew {amount}")),
    };

    match outcome {
        Ok(message) => {
            session.commit()?;
            println!("OK: {message}");
            Ok(0)
        }
        Err(err) => Ok(report_rejection(&err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"
name: Console
symbol: CON
policy:
  unit_cost: "10"
  supply_ceiling: 4
  max_per_request: 2
  royalty_bps: 250
base_uri: "ipfs://hidden.json"
royalty_receiver: "0x00000000000000000000000000000000000000ee"
issuance_enabled: true
public_sale_open: false
"#;

    fn init(dir: &Path) -> PathBuf {
        let config = dir.join("collection.yaml");
        std::fs::write(&config, COLLECTION).unwrap();
        let state = dir.join("state/state.json");
        assert_eq!(run_init(&InitArgs { config }, &state).unwrap(), 0);
        state
    }

    fn admin(command: AdminCommand, state: &Path) -> u8 {
        run_admin(&AdminArgs { command }, state).unwrap()
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let state = init(dir.path());
        let again = run_init(
            &InitArgs {
                config: dir.path().join("collection.yaml"),
            },
            &state,
        );
        assert!(again.is_err());
    }

    #[test]
    fn status_without_init_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_status(&dir.path().join("missing.json")).unwrap_err();
        assert!(format!("{err:#}").contains("mintgate init"));
    }

    #[test]
    fn admin_changes_persist() {
        let dir = tempfile::tempdir().unwrap();
        let state = init(dir.path());

        assert_eq!(
            admin(
                AdminCommand::PublicSale(SaleSwitch {
                    open: true,
                    close: false
                }),
                &state
            ),
            0
        );
        assert_eq!(
            admin(
                AdminCommand::BaseUri {
                    uri: "ipfs://cid/".into()
                },
                &state
            ),
            0
        );
        assert_eq!(admin(AdminCommand::Reveal, &state), 0);

        let session = Session::open(&state).unwrap();
        let phase = session.engine.phase();
        assert!(phase.public_sale_open);
        assert!(phase.revealed);
        assert_eq!(phase.base_uri, "ipfs://cid/");
    }

    #[test]
    fn airdrop_rejection_leaves_file_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let state = init(dir.path());
        let a = AccountId::new([1; 20]);
        let before = std::fs::read_to_string(&state).unwrap();

        assert_eq!(
            admin(
                AdminCommand::Airdrop {
                    recipients: vec![a, a]
                },
                &state
            ),
            1
        );
        assert_eq!(std::fs::read_to_string(&state).unwrap(), before);

        assert_eq!(
            admin(
                AdminCommand::Airdrop {
                    recipients: vec![a, AccountId::new([2; 20])]
                },
                &state
            ),
            0
        );
        assert_eq!(Session::open(&state).unwrap().engine.issued(), 2);
    }
}
