use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};
use solana_program::hash::hash;
use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::program::{get_return_data, invoke_signed, MAX_RETURN_DATA};

use super::{LiquidityPool, PoolView, PositionSnapshot, Slot0};
use crate::constants::POSITION_SEED;
use crate::errors::VaultError;
use crate::state::Vault;

const DISCRIMINATOR_LEN: usize = 8;

/// Concentrated liquidity pool state (leading fields only)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PoolState {
    pub sqrt_price_x64: u128,
    pub liquidity: u128,
    pub token_mint_0: Pubkey,
    pub token_mint_1: Pubkey,
    pub token_vault_0: Pubkey,
    pub token_vault_1: Pubkey,
    pub observation: Pubkey,
    pub tick: i32,
    pub tick_spacing: u16,
    pub fee_rate: u16,
    pub padding: [u8; 8],
}

/// Position state, one account per (pool, owner, tick range)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PositionState {
    pub liquidity: u128,
    pub fee_growth_inside_0_last_x64: u128,
    pub fee_growth_inside_1_last_x64: u128,
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub tokens_owed_0: u64,
    pub tokens_owed_1: u64,
    pub padding: [u8; 8],
}

impl From<&PositionState> for PositionSnapshot {
    fn from(position: &PositionState) -> Self {
        PositionSnapshot {
            liquidity: position.liquidity,
            fee_growth_inside_0_last: position.fee_growth_inside_0_last_x64,
            fee_growth_inside_1_last: position.fee_growth_inside_1_last_x64,
            tokens_owed_0: position.tokens_owed_0,
            tokens_owed_1: position.tokens_owed_1,
        }
    }
}

fn read_pod<T: Pod>(data: &[u8], error: VaultError) -> Result<T> {
    let end = DISCRIMINATOR_LEN + std::mem::size_of::<T>();
    match data
        .get(DISCRIMINATOR_LEN..end)
        .and_then(|bytes| bytemuck::try_pod_read_unaligned::<T>(bytes).ok())
    {
        Some(value) => Ok(value),
        None => Err(error.into()),
    }
}

/// Helper to deserialize the pool account safely
pub fn deserialize_pool(account: &AccountInfo) -> Result<PoolState> {
    let data = account.try_borrow_data()?;
    read_pod::<PoolState>(&data, VaultError::PoolMismatch)
}

pub fn deserialize_position(account: &AccountInfo) -> Result<PositionState> {
    let data = account.try_borrow_data()?;
    read_pod::<PositionState>(&data, VaultError::InvalidPositionAccount)
}

/// Address of the position the pool program keeps for `owner` over a range.
pub fn position_address(
    pool_program: &Pubkey,
    pool: &Pubkey,
    owner: &Pubkey,
    tick_lower: i32,
    tick_upper: i32,
) -> Pubkey {
    Pubkey::find_program_address(
        &[
            POSITION_SEED,
            pool.as_ref(),
            owner.as_ref(),
            &tick_lower.to_le_bytes(),
            &tick_upper.to_le_bytes(),
        ],
        pool_program,
    )
    .0
}

/// Anchor-style `global:<name>` discriminator followed by borsh args.
pub fn instruction_data<T: AnchorSerialize>(name: &str, args: &T) -> Result<Vec<u8>> {
    let preimage = format!("global:{}", name);
    let mut data = hash(preimage.as_bytes()).to_bytes()[..DISCRIMINATOR_LEN].to_vec();
    args.serialize(&mut data)
        .map_err(|_| ProgramError::InvalidInstructionData)?;
    Ok(data)
}

/// Decodes return data. The runtime trims trailing zero bytes, so the data is
/// padded back out before decoding.
pub fn decode_return_data<T: AnchorDeserialize>(mut data: Vec<u8>) -> Result<T> {
    if data.len() < MAX_RETURN_DATA {
        data.resize(MAX_RETURN_DATA, 0);
    }
    T::deserialize(&mut data.as_slice()).map_err(|_| VaultError::MissingReturnData.into())
}

fn return_data<T: AnchorDeserialize>(program_id: &Pubkey) -> Result<T> {
    let (program, data) = get_return_data().ok_or(VaultError::MissingReturnData)?;
    require_keys_eq!(program, *program_id, VaultError::MissingReturnData);
    decode_return_data(data)
}

#[derive(AnchorSerialize)]
struct ModifyLiquidityArgs {
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
}

#[derive(AnchorSerialize)]
struct CollectArgs {
    tick_lower: i32,
    tick_upper: i32,
    amount0_requested: u64,
    amount1_requested: u64,
}

#[derive(AnchorSerialize)]
struct ObserveArgs {
    seconds_agos: Vec<u32>,
}

fn find_position<'info>(
    pool_program: &Pubkey,
    pool: &Pubkey,
    owner: &Pubkey,
    positions: &[AccountInfo<'info>],
    tick_lower: i32,
    tick_upper: i32,
) -> Result<AccountInfo<'info>> {
    let address = position_address(pool_program, pool, owner, tick_lower, tick_upper);
    positions
        .iter()
        .find(|account| account.key == &address)
        .cloned()
        .ok_or_else(|| VaultError::InvalidPositionAccount.into())
}

/// An empty account is a position that was never opened.
fn read_position(
    account: &AccountInfo,
    pool_program: &Pubkey,
    pool: &Pubkey,
    owner: &Pubkey,
    tick_lower: i32,
    tick_upper: i32,
) -> Result<PositionSnapshot> {
    if account.data_is_empty() {
        return Ok(PositionSnapshot::default());
    }
    require_keys_eq!(*account.owner, *pool_program, VaultError::InvalidPositionAccount);
    let position = deserialize_position(account)?;
    require!(
        position.pool == *pool
            && position.owner == *owner
            && position.tick_lower == tick_lower
            && position.tick_upper == tick_upper,
        VaultError::InvalidPositionAccount
    );
    Ok(PositionSnapshot::from(&position))
}

fn slot0_of(pool: &AccountInfo) -> Result<Slot0> {
    let state = deserialize_pool(pool)?;
    Ok(Slot0 {
        sqrt_price_x64: state.sqrt_price_x64,
        tick: state.tick,
    })
}

/// Pool accounts for instructions that only value the vault.
#[derive(Accounts)]
pub struct PoolViewAccounts<'info> {
    /// The pool account
    /// CHECK: Matched against the vault and owned by the pool program
    #[account(owner = pool_program.key() @ VaultError::PoolMismatch)]
    pub pool: AccountInfo<'info>,

    /// Pool program
    /// CHECK: Program ID validation against the vault
    #[account(executable)]
    pub pool_program: AccountInfo<'info>,
}

impl<'info> PoolViewAccounts<'info> {
    /// Validates and builds a reader over the vault's positions.
    pub fn reader<'a>(
        &self,
        vault: &Vault,
        vault_key: Pubkey,
        positions: &'a [AccountInfo<'info>],
    ) -> Result<PoolReader<'a, 'info>> {
        require_keys_eq!(self.pool.key(), vault.pool, VaultError::PoolMismatch);
        require_keys_eq!(
            self.pool_program.key(),
            vault.pool_program,
            VaultError::PoolMismatch
        );
        Ok(PoolReader {
            pool_program: self.pool_program.key(),
            pool: self.pool.clone(),
            owner: vault_key,
            positions,
            tick_spacing: vault.tick_spacing,
        })
    }
}

/// `PoolView` straight from account data, without any CPI.
pub struct PoolReader<'a, 'info> {
    pool_program: Pubkey,
    pool: AccountInfo<'info>,
    owner: Pubkey,
    positions: &'a [AccountInfo<'info>],
    tick_spacing: i32,
}

impl<'a, 'info> PoolView for PoolReader<'a, 'info> {
    fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    fn slot0(&self) -> Result<Slot0> {
        slot0_of(&self.pool)
    }

    fn position(&self, tick_lower: i32, tick_upper: i32) -> Result<PositionSnapshot> {
        let account = find_position(
            &self.pool_program,
            self.pool.key,
            &self.owner,
            self.positions,
            tick_lower,
            tick_upper,
        )?;
        read_position(
            &account,
            &self.pool_program,
            self.pool.key,
            &self.owner,
            tick_lower,
            tick_upper,
        )
    }
}

/// The pool-side accounts every liquidity-moving instruction takes.
#[derive(Accounts)]
pub struct PoolAccounts<'info> {
    /// The pool account
    /// CHECK: Matched against the vault and owned by the pool program
    #[account(
        mut,
        owner = pool_program.key() @ VaultError::PoolMismatch
    )]
    pub pool: AccountInfo<'info>,

    /// Pool program
    /// CHECK: Program ID validation against the vault
    #[account(executable)]
    pub pool_program: AccountInfo<'info>,

    /// Pool oracle
    /// CHECK: Matched against the pool state
    pub observation: AccountInfo<'info>,

    /// Pool's token 0 reserve
    /// CHECK: Matched against the pool state
    #[account(mut)]
    pub pool_token_vault_0: AccountInfo<'info>,

    /// Pool's token 1 reserve
    /// CHECK: Matched against the pool state
    #[account(mut)]
    pub pool_token_vault_1: AccountInfo<'info>,
}

impl<'info> PoolAccounts<'info> {
    /// Checks the accounts belong to the vault's pool.
    pub fn validate(&self, vault: &Vault) -> Result<PoolState> {
        require_keys_eq!(self.pool.key(), vault.pool, VaultError::PoolMismatch);
        require_keys_eq!(
            self.pool_program.key(),
            vault.pool_program,
            VaultError::PoolMismatch
        );
        let state = deserialize_pool(&self.pool)?;
        require_keys_eq!(self.observation.key(), state.observation, VaultError::PoolMismatch);
        require_keys_eq!(
            self.pool_token_vault_0.key(),
            state.token_vault_0,
            VaultError::PoolMismatch
        );
        require_keys_eq!(
            self.pool_token_vault_1.key(),
            state.token_vault_1,
            VaultError::PoolMismatch
        );
        Ok(state)
    }

    /// Validates and builds a client that acts for the vault.
    pub fn client<'a>(
        &self,
        vault: &Vault,
        signer: VaultSigner<'a, 'info>,
        positions: &'a [AccountInfo<'info>],
    ) -> Result<PoolClient<'a, 'info>> {
        self.validate(vault)?;
        Ok(PoolClient {
            pool_program: self.pool_program.clone(),
            pool: self.pool.clone(),
            observation: self.observation.clone(),
            pool_token_vault_0: self.pool_token_vault_0.clone(),
            pool_token_vault_1: self.pool_token_vault_1.clone(),
            signer,
            positions,
            tick_spacing: vault.tick_spacing,
        })
    }
}

/// The vault PDA and the vault-side accounts it moves tokens with.
pub struct VaultSigner<'a, 'info> {
    pub authority: AccountInfo<'info>,
    /// Pays for new position accounts. Only needed when minting.
    pub payer: Option<AccountInfo<'info>>,
    pub token_vault_0: AccountInfo<'info>,
    pub token_vault_1: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub system_program: AccountInfo<'info>,
    pub seeds: &'a [&'a [u8]],
}

/// `LiquidityPool` over CPI. Position accounts are looked up by address among
/// the instruction's remaining accounts.
pub struct PoolClient<'a, 'info> {
    pool_program: AccountInfo<'info>,
    pool: AccountInfo<'info>,
    observation: AccountInfo<'info>,
    pool_token_vault_0: AccountInfo<'info>,
    pool_token_vault_1: AccountInfo<'info>,
    signer: VaultSigner<'a, 'info>,
    positions: &'a [AccountInfo<'info>],
    tick_spacing: i32,
}

impl<'a, 'info> PoolClient<'a, 'info> {
    fn position_account(&self, tick_lower: i32, tick_upper: i32) -> Result<AccountInfo<'info>> {
        find_position(
            self.pool_program.key,
            self.pool.key,
            self.signer.authority.key,
            self.positions,
            tick_lower,
            tick_upper,
        )
    }

    fn invoke(&self, data: Vec<u8>, accounts: &[(&AccountInfo<'info>, bool)]) -> Result<()> {
        let metas = accounts
            .iter()
            .map(|(account, is_writable)| AccountMeta {
                pubkey: *account.key,
                is_signer: account.is_signer || account.key == self.signer.authority.key,
                is_writable: *is_writable,
            })
            .collect();
        let instruction = Instruction {
            program_id: *self.pool_program.key,
            accounts: metas,
            data,
        };
        let mut infos: Vec<AccountInfo<'info>> =
            accounts.iter().map(|(account, _)| (*account).clone()).collect();
        infos.push(self.pool_program.clone());
        invoke_signed(&instruction, &infos, &[self.signer.seeds])?;
        Ok(())
    }
}

impl<'a, 'info> PoolView for PoolClient<'a, 'info> {
    fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    fn slot0(&self) -> Result<Slot0> {
        slot0_of(&self.pool)
    }

    fn position(&self, tick_lower: i32, tick_upper: i32) -> Result<PositionSnapshot> {
        let account = self.position_account(tick_lower, tick_upper)?;
        read_position(
            &account,
            self.pool_program.key,
            self.pool.key,
            self.signer.authority.key,
            tick_lower,
            tick_upper,
        )
    }
}

impl<'a, 'info> LiquidityPool for PoolClient<'a, 'info> {
    fn observe(&self, seconds_agos: &[u32]) -> Result<Vec<i64>> {
        let data = instruction_data(
            "observe",
            &ObserveArgs {
                seconds_agos: seconds_agos.to_vec(),
            },
        )?;
        self.invoke(data, &[(&self.pool, false), (&self.observation, false)])?;
        let cumulatives: Vec<i64> = return_data(self.pool_program.key)?;
        require!(
            cumulatives.len() == seconds_agos.len(),
            VaultError::OracleUnavailable
        );
        Ok(cumulatives)
    }

    fn mint(&mut self, tick_lower: i32, tick_upper: i32, liquidity: u128) -> Result<(u64, u64)> {
        let position = self.position_account(tick_lower, tick_upper)?;
        let payer = self
            .signer
            .payer
            .clone()
            .ok_or(VaultError::InvalidPositionAccount)?;
        let data = instruction_data(
            "mint",
            &ModifyLiquidityArgs {
                tick_lower,
                tick_upper,
                liquidity,
            },
        )?;
        self.invoke(
            data,
            &[
                (&self.pool, true),
                (&position, true),
                (&self.signer.authority, false),
                (&payer, true),
                (&self.signer.token_vault_0, true),
                (&self.signer.token_vault_1, true),
                (&self.pool_token_vault_0, true),
                (&self.pool_token_vault_1, true),
                (&self.signer.token_program, false),
                (&self.signer.system_program, false),
            ],
        )?;
        return_data(self.pool_program.key)
    }

    fn burn(&mut self, tick_lower: i32, tick_upper: i32, liquidity: u128) -> Result<(u64, u64)> {
        let position = self.position_account(tick_lower, tick_upper)?;
        let data = instruction_data(
            "burn",
            &ModifyLiquidityArgs {
                tick_lower,
                tick_upper,
                liquidity,
            },
        )?;
        self.invoke(
            data,
            &[
                (&self.pool, true),
                (&position, true),
                (&self.signer.authority, false),
                (&self.observation, false),
            ],
        )?;
        return_data(self.pool_program.key)
    }

    fn collect(
        &mut self,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u64,
        amount1_requested: u64,
    ) -> Result<(u64, u64)> {
        let position = self.position_account(tick_lower, tick_upper)?;
        let data = instruction_data(
            "collect",
            &CollectArgs {
                tick_lower,
                tick_upper,
                amount0_requested,
                amount1_requested,
            },
        )?;
        self.invoke(
            data,
            &[
                (&self.pool, true),
                (&position, true),
                (&self.signer.authority, false),
                (&self.pool_token_vault_0, true),
                (&self.pool_token_vault_1, true),
                (&self.signer.token_vault_0, true),
                (&self.signer.token_vault_1, true),
                (&self.signer.token_program, false),
            ],
        )?;
        return_data(self.pool_program.key)
    }
}
