use anyhow::Result;
use keygen::{KeyDeriver, SeedPhrase};

pub(crate) fn generate_key(deriver: KeyDeriver) -> Result<()> {
    tracing::info!("Generating XCH key...");
    let wallet = deriver.generate()?;
    println!("Mnemonic: {}", wallet.seed_phrase.phrase());
    println!("Private Key: {}", wallet.validator_key.to_hex());
    println!("Public Key: {}", wallet.validator_public_key);
    println!("Fingerprint: {}", wallet.fingerprint);
    println!("First address: {}", wallet.first_address);
    Ok(())
}

pub(crate) fn print_addresses(deriver: KeyDeriver, phrase: &SeedPhrase, index: u32, count: u32) {
    for address in deriver.wallet_addresses(phrase, index, count) {
        println!("{address}");
    }
}
