use anyhow::Result;
use std::path::Path;

use crate::models::UserProfile;

pub fn show_profile(profile_path: Option<&Path>) -> Result<()> {
    let profile = UserProfile::resolve(profile_path)?;

    println!("Profile: {}", profile.name);
    println!("────────────────────────────────");
    println!();
    println!("{}", profile.to_toml()?);

    Ok(())
}

pub fn init_profile(force: bool) -> Result<()> {
    let profile_file = UserProfile::profile_file()?;

    if profile_file.exists() && !force {
        println!("Profile already exists at: {}", profile_file.display());
        println!("Use --force to overwrite");
        return Ok(());
    }

    UserProfile::sample().save_to(&profile_file)?;

    println!("✓ Sample profile written to: {}", profile_file.display());
    println!();
    println!("Edit it to describe yourself, then run: fit-coach chat");

    Ok(())
}
