//! # Issuance Engine
//!
//! `IssuanceEngine` owns the policy, the phase flags, the allowlist root,
//! the allowance ledger, the supply counter, the registry, the royalty
//! receiver and the collected proceeds. There is no global state: every
//! operation goes through `&self` (reads) or `&mut self` (mutations), so a
//! host serializes mutations by holding one lock around the engine.
//!
//! ## Request Pipeline
//!
//! ```text
//! public:   gate ─────────────────────────────▶ executor ─▶ proceeds
//! presale:  gate ─▶ proof vs root ─▶ ledger ─▶ executor ─▶ ledger.record ─▶ proceeds
//! ```
//!
//! Every check precedes the first write. The ledger is only written after
//! the executor has minted, and the executor cannot fail after its own
//! ceiling check, so a rejection anywhere leaves the engine unchanged.

use serde::Serialize;

use mintgate_core::{
    AccountId, Amount, CollectionConfig, Count, Hash256, IssuanceError, ItemId, Phase,
    PhaseState, Policy,
};
use mintgate_crypto::{parse_proof, verify_allowance};

use crate::admin::AdminCapability;
use crate::executor;
use crate::gate::{admit, Admission, RequestKind};
use crate::ledger::AllowanceLedger;
use crate::metadata;
use crate::registry::{InMemoryRegistry, TokenRegistry};
use crate::royalty::royalty_amount;
use crate::supply::SupplyCounter;

/// Result of an accepted issuance request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issuance {
    /// Account that received the items.
    pub recipient: AccountId,
    /// Newly assigned ids, ascending.
    pub ids: Vec<ItemId>,
    /// Payment credited to proceeds (the full amount offered).
    pub paid: Amount,
}

/// Read-only summary of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStatus {
    pub name: String,
    pub symbol: String,
    pub phase: Phase,
    pub issuance_enabled: bool,
    pub public_sale_open: bool,
    pub revealed: bool,
    pub base_uri: String,
    pub unit_cost: Amount,
    pub supply_ceiling: Count,
    pub max_per_request: Count,
    pub royalty_bps: u16,
    pub royalty_receiver: AccountId,
    pub issued: Count,
    pub remaining: Count,
    pub allowlist_root: Option<Hash256>,
    pub proceeds: Amount,
}

/// The capped issuance engine.
#[derive(Debug, Clone)]
pub struct IssuanceEngine<R: TokenRegistry = InMemoryRegistry> {
    pub(crate) name: String,
    pub(crate) symbol: String,
    pub(crate) policy: Policy,
    pub(crate) phase: PhaseState,
    pub(crate) allowlist_root: Option<Hash256>,
    pub(crate) ledger: AllowanceLedger,
    pub(crate) supply: SupplyCounter,
    pub(crate) registry: R,
    pub(crate) royalty_receiver: AccountId,
    pub(crate) proceeds: Amount,
    pub(crate) admin: AdminCapability,
}

impl<R: TokenRegistry + Default> IssuanceEngine<R> {
    /// Create an engine with an empty registry and nothing issued.
    ///
    /// Returns the engine together with its only [`AdminCapability`].
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        policy: Policy,
        phase: PhaseState,
        royalty_receiver: AccountId,
    ) -> (Self, AdminCapability) {
        let admin = AdminCapability::generate();
        let engine = Self {
            name: name.into(),
            symbol: symbol.into(),
            supply: SupplyCounter::new(policy.supply_ceiling()),
            policy,
            phase,
            allowlist_root: None,
            ledger: AllowanceLedger::new(),
            registry: R::default(),
            royalty_receiver,
            proceeds: Amount::ZERO,
            admin: admin.clone(),
        };
        (engine, admin)
    }

    /// Create an engine from a collection configuration.
    pub fn from_config(config: &CollectionConfig) -> (Self, AdminCapability) {
        let (mut engine, admin) = Self::new(
            config.name.clone(),
            config.symbol.clone(),
            config.policy.clone(),
            config.initial_phase(),
            config.royalty_receiver,
        );
        engine.allowlist_root = config.allowlist_root;
        tracing::info!(
            name = %engine.name,
            supply_ceiling = engine.policy.supply_ceiling(),
            "collection initialized"
        );
        (engine, admin)
    }
}

impl<R: TokenRegistry> IssuanceEngine<R> {
    // ─── Issuance ───────────────────────────────────────────────────

    /// Public issuance of `quantity` items to `caller`.
    pub fn issue_public(
        &mut self,
        caller: AccountId,
        quantity: Count,
        payment: Amount,
    ) -> Result<Issuance, IssuanceError> {
        let admission = self.admit(RequestKind::Public, caller, quantity, payment)?;
        self.execute(RequestKind::Public, caller, quantity, payment, admission)
    }

    /// Presale issuance against a proven allowance.
    pub fn issue_presale(
        &mut self,
        caller: AccountId,
        quantity: Count,
        claimed_allowance: Count,
        proof: &[Hash256],
        payment: Amount,
    ) -> Result<Issuance, IssuanceError> {
        self.presale(caller, quantity, claimed_allowance, Some(proof), payment)
    }

    /// Presale issuance with a hex-encoded proof. A malformed element makes
    /// the proof invalid; it is reported in the same position of the check
    /// order as a well-formed proof that does not verify.
    pub fn issue_presale_encoded<S: AsRef<str>>(
        &mut self,
        caller: AccountId,
        quantity: Count,
        claimed_allowance: Count,
        proof: &[S],
        payment: Amount,
    ) -> Result<Issuance, IssuanceError> {
        let parsed = parse_proof(proof);
        self.presale(caller, quantity, claimed_allowance, parsed.as_deref(), payment)
    }

    fn presale(
        &mut self,
        caller: AccountId,
        quantity: Count,
        claimed_allowance: Count,
        proof: Option<&[Hash256]>,
        payment: Amount,
    ) -> Result<Issuance, IssuanceError> {
        let admission = self.admit(RequestKind::Presale, caller, quantity, payment)?;

        let proven = match proof {
            Some(proof) => self.verify_allowance(&caller, claimed_allowance, proof),
            None => false,
        };
        if !proven {
            tracing::warn!(%caller, claimed_allowance, "presale rejected: ALLOWLIST_PROOF_INVALID");
            return Err(IssuanceError::AllowlistProofInvalid);
        }

        if let Err(err) = self.ledger.ensure_within(&caller, claimed_allowance, quantity) {
            tracing::warn!(%caller, code = err.code(), "presale rejected");
            return Err(err);
        }

        let issuance = self.execute(RequestKind::Presale, caller, quantity, payment, admission)?;
        self.ledger.record(caller, quantity);
        Ok(issuance)
    }

    fn admit(
        &self,
        kind: RequestKind,
        caller: AccountId,
        quantity: Count,
        payment: Amount,
    ) -> Result<Admission, IssuanceError> {
        admit(&self.policy, &self.phase, self.supply.issued(), kind, quantity, payment).map_err(
            |err| {
                tracing::warn!(%caller, %kind, quantity, code = err.code(), "issuance rejected");
                err
            },
        )
    }

    fn execute(
        &mut self,
        kind: RequestKind,
        caller: AccountId,
        quantity: Count,
        payment: Amount,
        admission: Admission,
    ) -> Result<Issuance, IssuanceError> {
        let ids = executor::issue(&mut self.supply, &mut self.registry, caller, quantity)?;
        self.proceeds = self.proceeds.saturating_add(payment);
        tracing::info!(
            recipient = %caller,
            %kind,
            quantity,
            cost = %admission.cost,
            paid = %payment,
            issued = self.supply.issued(),
            "items issued"
        );
        Ok(Issuance {
            recipient: caller,
            ids,
            paid: payment,
        })
    }

    // ─── Read side ──────────────────────────────────────────────────

    /// Whether `(account, allowance)` proves against the current root.
    /// Always `false` while no root is set.
    pub fn verify_allowance(&self, account: &AccountId, allowance: Count, proof: &[Hash256]) -> bool {
        self.allowlist_root
            .as_ref()
            .is_some_and(|root| verify_allowance(account, allowance, proof, root))
    }

    /// Metadata URI of an issued item.
    pub fn resolve_uri(&self, id: ItemId) -> Result<String, IssuanceError> {
        metadata::resolve_uri(&self.phase, self.supply.issued(), id)
    }

    /// Royalty receiver and amount owed on a sale of `sale_value`.
    pub fn royalty_for(&self, sale_value: Amount) -> (AccountId, Amount) {
        (
            self.royalty_receiver,
            royalty_amount(sale_value, self.policy.royalty_bps()),
        )
    }

    /// Ids held by `account`.
    pub fn owned_items(&self, account: &AccountId) -> Vec<ItemId> {
        self.registry.ids_owned_by(account)
    }

    /// Number of items held by `account`.
    pub fn balance_of(&self, account: &AccountId) -> Count {
        self.registry.count_owned_by(account)
    }

    /// Presale quantity already consumed by `account`.
    pub fn allowance_consumed(&self, account: &AccountId) -> Count {
        self.ledger.consumed(account)
    }

    /// Items issued so far.
    pub fn issued(&self) -> Count {
        self.supply.issued()
    }

    /// The immutable policy.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Current phase flags.
    pub fn phase(&self) -> &PhaseState {
        &self.phase
    }

    /// Current allowlist root, if any.
    pub fn allowlist_root(&self) -> Option<Hash256> {
        self.allowlist_root
    }

    /// Proceeds collected and not yet withdrawn.
    pub fn proceeds(&self) -> Amount {
        self.proceeds
    }

    /// The registry backing this engine.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Summary of policy, flags and counters.
    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            phase: self.phase.phase(),
            issuance_enabled: self.phase.issuance_enabled,
            public_sale_open: self.phase.public_sale_open,
            revealed: self.phase.revealed,
            base_uri: self.phase.base_uri.clone(),
            unit_cost: self.policy.unit_cost(),
            supply_ceiling: self.policy.supply_ceiling(),
            max_per_request: self.policy.max_per_request(),
            royalty_bps: self.policy.royalty_bps(),
            royalty_receiver: self.royalty_receiver,
            issued: self.supply.issued(),
            remaining: self.supply.remaining(),
            allowlist_root: self.allowlist_root,
            proceeds: self.proceeds,
        }
    }

    // ─── Administrative gateway ─────────────────────────────────────

    /// Switch issuance on or off.
    pub fn set_issuance_enabled(
        &mut self,
        cap: &AdminCapability,
        enabled: bool,
    ) -> Result<(), IssuanceError> {
        self.admin.authorize(cap)?;
        self.phase.issuance_enabled = enabled;
        tracing::info!(enabled, "issuance switch set");
        Ok(())
    }

    /// Open or close the public sale.
    pub fn set_public_sale_open(
        &mut self,
        cap: &AdminCapability,
        open: bool,
    ) -> Result<(), IssuanceError> {
        self.admin.authorize(cap)?;
        self.phase.public_sale_open = open;
        tracing::info!(open, "public sale switch set");
        Ok(())
    }

    /// Reveal metadata. One-way.
    pub fn reveal(&mut self, cap: &AdminCapability) -> Result<(), IssuanceError> {
        self.admin.authorize(cap)?;
        self.phase.revealed = true;
        tracing::info!("metadata revealed");
        Ok(())
    }

    /// Replace the metadata base URI.
    pub fn set_base_uri(
        &mut self,
        cap: &AdminCapability,
        base_uri: impl Into<String>,
    ) -> Result<(), IssuanceError> {
        self.admin.authorize(cap)?;
        self.phase.base_uri = base_uri.into();
        tracing::info!(base_uri = %self.phase.base_uri, "base URI set");
        Ok(())
    }

    /// Replace the allowlist root. Proofs for the old set stop verifying;
    /// the ledger is kept.
    pub fn set_allowlist_root(
        &mut self,
        cap: &AdminCapability,
        root: Hash256,
    ) -> Result<(), IssuanceError> {
        self.admin.authorize(cap)?;
        self.allowlist_root = Some(root);
        tracing::info!(%root, "allowlist root set");
        Ok(())
    }

    /// Replace the royalty receiver.
    pub fn set_royalty_receiver(
        &mut self,
        cap: &AdminCapability,
        receiver: AccountId,
    ) -> Result<(), IssuanceError> {
        self.admin.authorize(cap)?;
        self.royalty_receiver = receiver;
        tracing::info!(%receiver, "royalty receiver set");
        Ok(())
    }

    /// Issue one item to each recipient, bypassing phase, payment and
    /// allowance checks.
    pub fn airdrop(
        &mut self,
        cap: &AdminCapability,
        recipients: &[AccountId],
    ) -> Result<Vec<ItemId>, IssuanceError> {
        self.admin.authorize(cap)?;
        let ids = executor::issue_batch(&mut self.supply, &mut self.registry, recipients)?;
        tracing::info!(count = ids.len(), issued = self.supply.issued(), "airdrop issued");
        Ok(ids)
    }

    /// Take the collected proceeds, leaving zero.
    pub fn withdraw(&mut self, cap: &AdminCapability) -> Result<Amount, IssuanceError> {
        self.admin.authorize(cap)?;
        let amount = std::mem::replace(&mut self.proceeds, Amount::ZERO);
        tracing::info!(%amount, "proceeds withdrawn");
        Ok(amount)
    }
}
