//! Command implementations

pub mod add_user;
pub mod input;
pub mod new;
pub mod profile;
pub mod version;

use clap::Args;

/// Project fields shared by `new` and `add-user`.
///
/// The password is read from `K_INSTALLER_PASSWORD` or prompted for; it is
/// never accepted as a flag.
#[derive(Args, Debug, Default)]
pub struct ProjectArgs {
    /// Project name (also the remote login user)
    #[arg(long)]
    pub name: Option<String>,

    /// Remote hostname
    #[arg(long)]
    pub host: Option<String>,

    /// SSH port [default: 22]
    #[arg(long)]
    pub port: Option<String>,

    /// Project type: 1 or yii, 2 or wp/hugo
    #[arg(long = "type", value_name = "TYPE")]
    pub project_type: Option<String>,

    /// Public key file name under ~/.ssh
    #[arg(long, value_name = "NAME")]
    pub ssh_key: Option<String>,
}
