//! Token vault with an admin-controlled fee rate.
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

/// Basis points denominator.
pub const FEE_DENOMINATOR: u64 = 10_000;
const VAULT_SEED: &[u8] = b"vault";

#[program]
pub mod token_vault {
    use super::*;

    /// Update the fee charged on withdrawals.
    pub fn set_fee_rate(ctx: Context<SetFeeRate>, new_rate: u64) -> Result<()> {
        let vault = &mut ctx.accounts.vault;
        vault.fee_rate = new_rate;
        Ok(())
    }

    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        let vault = &mut ctx.accounts.vault;
        vault.total_deposits = vault.total_deposits + amount;

        token::transfer(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.user_tokens.to_account_info(),
                    to: ctx.accounts.vault_tokens.to_account_info(),
                    authority: ctx.accounts.user.to_account_info(),
                },
            ),
            amount,
        )?;
        Ok(())
    }

    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        let vault = &mut ctx.accounts.vault;
        if amount > vault.total_deposits || amount == 0 {
            return err!(VaultError::InvalidAmount);
        }

        let fee = amount * vault.fee_rate / FEE_DENOMINATOR;
        vault.total_deposits = vault.total_deposits - amount;
        msg!("withdrawing {} (fee {})", amount, fee);
        Ok(())
    }
}

#[derive(Accounts)]
pub struct SetFeeRate<'info> {
    #[account(mut)]
    pub vault: Account<'info, Vault>,
    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub vault: Account<'info, Vault>,
    #[account(mut)]
    pub user_tokens: Account<'info, TokenAccount>,
    #[account(mut)]
    pub vault_tokens: Account<'info, TokenAccount>,
    pub user: Signer<'info>,
    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub vault: Account<'info, Vault>,
    /// CHECK: only used as a PDA signer
    pub vault_authority: UncheckedAccount<'info>,
    pub user: Signer<'info>,
}

#[account]
pub struct Vault {
    pub admin: Pubkey,
    pub fee_rate: u64,
    pub total_deposits: u64,
}

#[error_code]
pub enum VaultError {
    #[msg("Invalid amount")]
    InvalidAmount,
}
