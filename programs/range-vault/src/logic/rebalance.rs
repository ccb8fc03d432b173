//! The rebalancing engine.
//!
//! A rebalance pulls everything out of the pool, books fees, and redeploys
//! the idle balances: first into the wide base range, then whatever single
//! token the base range could not absorb into a one-sided limit range just
//! below (bid) or just above (ask) the current price.

use anchor_lang::prelude::*;

use super::fees::protocol_share;
use super::ledger::accrue_streaming_fee;
use super::oracle::{check_tick_bounds, check_tick_move, guarded_tick};
use super::position::{self, liquidity_for_range};
use crate::errors::VaultError;
use crate::events::{CollectFees, Snapshot};
use crate::math::floor_to_spacing;
use crate::pool::LiquidityPool;
use crate::state::{Strategy, TickRange, TokenAmounts, Vault};

/// Ranges to deploy into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RebalancePlan {
    pub base: TickRange,
    pub bid: TickRange,
    pub ask: TickRange,
}

impl RebalancePlan {
    /// Ranges centred on `tick`. The base range is one spacing wider above
    /// so both ends stay aligned around the current spacing bucket.
    pub fn around(
        tick: i32,
        tick_spacing: i32,
        base_threshold: i32,
        limit_threshold: i32,
    ) -> Self {
        let floor = floor_to_spacing(tick, tick_spacing);
        let ceil = floor + tick_spacing;
        Self {
            base: TickRange::new(floor - base_threshold, ceil + base_threshold),
            bid: TickRange::new(floor - limit_threshold, floor),
            ask: TickRange::new(ceil, ceil + limit_threshold),
        }
    }

    /// Every range must be valid and the limit ranges one-sided at `tick`.
    pub fn validate(&self, tick: i32, tick_spacing: i32) -> Result<()> {
        self.base.validate(tick_spacing)?;
        self.bid.validate(tick_spacing)?;
        self.ask.validate(tick_spacing)?;
        require!(self.bid.upper <= tick, VaultError::BidAboveCurrentTick);
        require!(self.ask.lower > tick, VaultError::AskAtOrBelowCurrentTick);
        Ok(())
    }
}

/// Events and balances produced by one rebalance.
#[derive(Clone, Debug)]
pub struct RebalanceOutcome {
    pub tick: i32,
    pub fees: Vec<CollectFees>,
    pub snapshot: Snapshot,
    pub streaming_fee: TokenAmounts,
    /// Vault token account balances once liquidity is redeployed
    pub balances: TokenAmounts,
}

/// Decides whether the keeper may rebalance now, and around which tick.
///
/// Checks run in order: cooldown, spot against TWAP, tick move since the
/// last rebalance, and room to the tick bounds.
pub fn plan_rebalance<P: LiquidityPool>(
    strategy: &Strategy,
    pool: &P,
    now: i64,
) -> Result<(i32, RebalancePlan)> {
    if strategy.has_rebalanced() {
        let ready_at = strategy
            .last_rebalance_ts
            .checked_add(strategy.rebalance_cooldown)
            .ok_or(VaultError::MathOverflow)?;
        require!(now >= ready_at, VaultError::RebalanceCooldown);
    }

    let tick = guarded_tick(pool, strategy)?;
    check_tick_move(strategy, tick)?;

    let tick_spacing = pool.tick_spacing();
    check_tick_bounds(strategy, tick, tick_spacing)?;

    Ok((
        tick,
        RebalancePlan::around(
            tick,
            tick_spacing,
            strategy.base_threshold,
            strategy.limit_threshold,
        ),
    ))
}

/// Withdraws both positions and redeploys everything into `plan`.
///
/// `balances` are the vault token account balances on entry; the caller
/// persists the vault afterwards.
pub fn execute_rebalance<P: LiquidityPool>(
    vault: &mut Vault,
    pool: &mut P,
    balances: TokenAmounts,
    plan: &RebalancePlan,
    now: i64,
) -> Result<RebalanceOutcome> {
    let tick = pool.slot0()?.tick;
    plan.validate(tick, vault.tick_spacing)?;

    let mut balances = balances;
    let mut fees = Vec::with_capacity(2);
    for range in [vault.base, vault.limit] {
        if !range.is_set() {
            continue;
        }
        let collected = position::withdraw(pool, range)?;
        balances = balances.checked_add(collected.collected)?;

        let from_pool = collected.fees();
        let to_protocol = protocol_share(from_pool, vault.protocol_fee_bps)?;
        vault.accrue_protocol_fees(to_protocol)?;
        fees.push(CollectFees {
            pool: vault.pool,
            tick_lower: range.lower,
            tick_upper: range.upper,
            fees_from_pool_0: from_pool.amount0,
            fees_from_pool_1: from_pool.amount1,
            fees_to_protocol_0: to_protocol.amount0,
            fees_to_protocol_1: to_protocol.amount1,
        });
    }

    // everything is idle now, so idle is the whole of assets under management
    let assets = vault.idle(balances);
    let streaming = accrue_streaming_fee(vault, assets, now)?;

    let idle = vault.idle(balances);
    let snapshot = Snapshot {
        pool: vault.pool,
        tick,
        total_amount_0: idle.amount0,
        total_amount_1: idle.amount1,
        total_supply: vault.total_supply,
    };

    let used = position::deposit(pool, plan.base, idle.amount0, idle.amount1)?;
    balances = balances.checked_sub(used)?;

    let idle = vault.idle(balances);
    let bid_liquidity = liquidity_for_range(pool, plan.bid, idle.amount0, idle.amount1)?;
    let ask_liquidity = liquidity_for_range(pool, plan.ask, idle.amount0, idle.amount1)?;
    let limit = if bid_liquidity > ask_liquidity {
        plan.bid
    } else {
        plan.ask
    };
    let used = position::deposit(pool, limit, idle.amount0, idle.amount1)?;
    balances = balances.checked_sub(used)?;

    vault.base = plan.base;
    vault.limit = limit;

    Ok(RebalanceOutcome {
        tick,
        fees,
        snapshot,
        streaming_fee: streaming,
        balances,
    })
}

/// Keeper entry point: guard, plan, execute and record on the strategy.
pub fn rebalance<P: LiquidityPool>(
    vault: &mut Vault,
    strategy: &mut Strategy,
    pool: &mut P,
    balances: TokenAmounts,
    now: i64,
) -> Result<RebalanceOutcome> {
    let (tick, plan) = plan_rebalance(strategy, pool, now)?;
    let outcome = execute_rebalance(vault, pool, balances, &plan, now)?;
    strategy.record_rebalance(tick, now);
    Ok(outcome)
}
