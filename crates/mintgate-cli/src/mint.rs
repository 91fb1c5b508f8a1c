//! # Mint & Query Subcommands
//!
//! - `mint public` / `mint presale`: issue to an account through the same
//!   gate, proof and ledger checks as the HTTP service.
//! - `item uri` / `item owned`: metadata and holdings.
//! - `royalty`: royalty receiver and amount for a sale value.
//!
//! Presale proofs come either from repeated `--proof` flags or from a bundle
//! written by `mintgate allowlist build`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use mintgate_core::{AccountId, Amount, Count, ItemId};
use mintgate_state::Issuance;

use crate::allowlist::load_bundle;
use crate::{report_rejection, Session};

/// Arguments for `mintgate mint`.
#[derive(Args, Debug)]
pub struct MintArgs {
    #[command(subcommand)]
    pub command: MintCommand,
}

/// Mint subcommands.
#[derive(Subcommand, Debug)]
pub enum MintCommand {
    /// Public issuance.
    Public {
        /// Recipient account.
        #[arg(long)]
        account: AccountId,
        /// Number of items.
        #[arg(long)]
        quantity: Count,
        /// Payment offered, in base units.
        #[arg(long)]
        payment: Amount,
    },

    /// Allowlisted presale issuance.
    Presale {
        /// Recipient account.
        #[arg(long)]
        account: AccountId,
        /// Number of items.
        #[arg(long)]
        quantity: Count,
        /// Committed allowance. Taken from the bundle when omitted.
        #[arg(long)]
        allowance: Option<Count>,
        /// Sibling hashes, leaf level first. Repeat per element.
        #[arg(long = "proof", conflicts_with = "bundle")]
        proof: Vec<String>,
        /// Bundle written by `allowlist build`.
        #[arg(long)]
        bundle: Option<PathBuf>,
        /// Payment offered, in base units.
        #[arg(long)]
        payment: Amount,
    },
}

/// Arguments for `mintgate item`.
#[derive(Args, Debug)]
pub struct ItemArgs {
    #[command(subcommand)]
    pub command: ItemCommand,
}

/// Item subcommands.
#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    /// Print the metadata URI of an issued item.
    Uri {
        /// Item id.
        id: u64,
    },

    /// List the items an account holds.
    Owned {
        /// Account to look up.
        account: AccountId,
    },
}

/// Arguments for `mintgate royalty`.
#[derive(Args, Debug)]
pub struct RoyaltyArgs {
    /// Sale value in base units.
    pub sale_value: Amount,
}

/// Execute `mintgate mint`.
pub fn run_mint(args: &MintArgs, state: &Path) -> Result<u8> {
    let mut session = Session::open(state)?;

    let outcome = match &args.command {
        MintCommand::Public {
            account,
            quantity,
            payment,
        } => session.engine.issue_public(*account, *quantity, *payment),
        MintCommand::Presale {
            account,
            quantity,
            allowance,
            proof,
            bundle,
            payment,
        } => {
            let (allowance, proof) = presale_proof(account, *allowance, proof, bundle.as_deref())?;
            session
                .engine
                .issue_presale_encoded(*account, *quantity, allowance, &proof, *payment)
        }
    };

    match outcome {
        Ok(issuance) => {
            session.commit()?;
            print_issuance(&issuance);
            Ok(0)
        }
        Err(err) => Ok(report_rejection(&err)),
    }
}

/// Resolve the claimed allowance and proof from flags or a bundle.
fn presale_proof(
    account: &AccountId,
    allowance: Option<Count>,
    proof: &[String],
    bundle: Option<&Path>,
) -> Result<(Count, Vec<String>)> {
    match bundle {
        Some(path) => {
            let bundle = load_bundle(path)?;
            let Some(entry) = bundle.entry_for(account) else {
                bail!("{account} is not in bundle {}", path.display());
            };
            let proof = entry.proof.iter().map(|h| h.to_hex()).collect();
            Ok((allowance.unwrap_or(entry.allowance), proof))
        }
        None => match allowance {
            Some(allowance) => Ok((allowance, proof.to_vec())),
            None => bail!("--allowance is required without --bundle"),
        },
    }
}

fn print_issuance(issuance: &Issuance) {
    let ids: Vec<String> = issuance.ids.iter().map(ToString::to_string).collect();
    println!(
        "OK: issued ids [{}] to {} (paid {})",
        ids.join(", "),
        issuance.recipient,
        issuance.paid
    );
}

/// Execute `mintgate item`.
pub fn run_item(args: &ItemArgs, state: &Path) -> Result<u8> {
    let session = Session::open(state)?;
    match &args.command {
        ItemCommand::Uri { id } => match session.engine.resolve_uri(ItemId(*id)) {
            Ok(uri) => {
                println!("{uri}");
                Ok(0)
            }
            Err(err) => Ok(report_rejection(&err)),
        },
        ItemCommand::Owned { account } => {
            let ids: Vec<String> = session
                .engine
                .owned_items(account)
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("{account}: {} item(s) [{}]", ids.len(), ids.join(", "));
            Ok(0)
        }
    }
}

/// Execute `mintgate royalty`.
pub fn run_royalty(args: &RoyaltyArgs, state: &Path) -> Result<u8> {
    let session = Session::open(state)?;
    let (receiver, amount) = session.engine.royalty_for(args.sale_value);
    println!("{amount} to {receiver}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{run_admin, run_init, AdminArgs, AdminCommand, InitArgs};
    use mintgate_crypto::{AllowlistEntry, AllowlistTree};

    const COLLECTION: &str = r#"
name: Mintable
symbol: MNT
policy:
  unit_cost: "10"
  supply_ceiling: 5
  max_per_request: 3
  royalty_bps: 1000
base_uri: "ipfs://hidden.json"
royalty_receiver: "0x00000000000000000000000000000000000000ee"
issuance_enabled: true
public_sale_open: false
"#;

    fn acct(b: u8) -> AccountId {
        AccountId::new([b; 20])
    }

    fn init(dir: &Path) -> PathBuf {
        let config = dir.join("collection.yaml");
        std::fs::write(&config, COLLECTION).unwrap();
        let state = dir.join("state.json");
        run_init(&InitArgs { config }, &state).unwrap();
        state
    }

    fn public(account: AccountId, quantity: Count, payment: u128) -> MintArgs {
        MintArgs {
            command: MintCommand::Public {
                account,
                quantity,
                payment: Amount(payment),
            },
        }
    }

    #[test]
    fn public_mint_respects_phase() {
        let dir = tempfile::tempdir().unwrap();
        let state = init(dir.path());

        assert_eq!(run_mint(&public(acct(1), 1, 10), &state).unwrap(), 1);
        run_admin(
            &AdminArgs {
                command: AdminCommand::PublicSale(crate::collection::SaleSwitch {
                    open: true,
                    close: false,
                }),
            },
            &state,
        )
        .unwrap();
        assert_eq!(run_mint(&public(acct(1), 2, 20), &state).unwrap(), 0);

        let session = Session::open(&state).unwrap();
        assert_eq!(session.engine.owned_items(&acct(1)), vec![ItemId(1), ItemId(2)]);
        assert_eq!(session.engine.proceeds(), Amount(20));
    }

    #[test]
    fn presale_from_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let state = init(dir.path());

        let tree = AllowlistTree::build(vec![
            AllowlistEntry {
                account: acct(1),
                allowance: 2,
            },
            AllowlistEntry {
                account: acct(2),
                allowance: 1,
            },
        ])
        .unwrap();
        let bundle_path = dir.path().join("bundle.json");
        std::fs::write(&bundle_path, serde_json::to_string(&tree.bundle()).unwrap()).unwrap();
        run_admin(
            &AdminArgs {
                command: AdminCommand::Root { root: tree.root() },
            },
            &state,
        )
        .unwrap();

        let presale = |quantity, allowance| MintArgs {
            command: MintCommand::Presale {
                account: acct(1),
                quantity,
                allowance,
                proof: Vec::new(),
                bundle: Some(bundle_path.clone()),
                payment: Amount(u128::from(quantity) * 10),
            },
        };

        assert_eq!(run_mint(&presale(2, None), &state).unwrap(), 0);
        assert_eq!(run_mint(&presale(1, None), &state).unwrap(), 1);
        assert_eq!(run_mint(&presale(1, Some(5)), &state).unwrap(), 1);

        let session = Session::open(&state).unwrap();
        assert_eq!(session.engine.allowance_consumed(&acct(1)), 2);
        assert_eq!(session.engine.issued(), 2);
    }

    #[test]
    fn presale_needs_allowance_without_bundle() {
        assert!(presale_proof(&acct(1), None, &[], None).is_err());
        let (allowance, proof) =
            presale_proof(&acct(1), Some(3), &["ab".to_string()], None).unwrap();
        assert_eq!(allowance, 3);
        assert_eq!(proof, vec!["ab".to_string()]);
    }

    #[test]
    fn item_and_royalty_queries() {
        let dir = tempfile::tempdir().unwrap();
        let state = init(dir.path());

        let uri = ItemArgs {
            command: ItemCommand::Uri { id: 1 },
        };
        assert_eq!(run_item(&uri, &state).unwrap(), 1);
        run_admin(
            &AdminArgs {
                command: AdminCommand::Airdrop {
                    recipients: vec![acct(3)],
                },
            },
            &state,
        )
        .unwrap();
        assert_eq!(run_item(&uri, &state).unwrap(), 0);

        let royalty = RoyaltyArgs {
            sale_value: Amount(1000),
        };
        assert_eq!(run_royalty(&royalty, &state).unwrap(), 0);
        let session = Session::open(&state).unwrap();
        assert_eq!(session.engine.royalty_for(Amount(1000)).1, Amount(100));
    }
}
