use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};
use std::convert::TryInto;

entrypoint!(process_instruction);

static mut CALL_COUNT: u64 = 0;

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    let iter = &mut accounts.iter();
    let source = next_account_info(iter)?;
    let destination = next_account_info(iter)?;

    if source.owner != program_id {
        return Err(ProgramError::IncorrectProgramId);
    }

    let amount = u64::from_le_bytes(data[..8].try_into().unwrap());
    **source.try_borrow_mut_lamports()? -= amount;
    **destination.try_borrow_mut_lamports()? += amount;

    unsafe {
        CALL_COUNT += 1;
    }
    msg!("moved {} lamports", amount);
    Ok(())
}

fn checked_fee(amount: u64, rate: u64) -> Option<u64> {
    amount.checked_mul(rate).and_then(|v| v.checked_div(10_000))
}
