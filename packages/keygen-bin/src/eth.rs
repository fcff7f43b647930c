use anyhow::Result;
use keygen::EthAccount;

pub(crate) fn generate_key() -> Result<()> {
    tracing::info!("Generating ETH key...");
    let account = EthAccount::generate()?;
    println!("Private Key: {}", account.private_key_hex());
    println!("Public Key: {}", account.public_key_hex());
    println!("Address: {}", account.address());
    Ok(())
}
