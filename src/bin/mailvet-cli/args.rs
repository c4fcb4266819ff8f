use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use mailvet::{EngineConfig, ValidationMode};

/// Vérifie la délivrabilité d'adresses e-mail sans envoyer de message.
#[derive(Debug, Parser)]
#[command(name = "mailvet-cli", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// vérifie une adresse unique
    Check(CheckArgs),
    /// traite une liste d'adresses (fichier ou stdin)
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// adresse e-mail à vérifier
    pub email: String,

    #[command(flatten)]
    pub common: CommonArgs,

    /// affiche aussi les enregistrements SPF/DMARC du domaine
    #[cfg(feature = "with-auth-records")]
    #[arg(long)]
    pub auth: bool,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// fichier d'adresses (une par ligne)
    #[arg(long, value_name = "FILE")]
    pub input: Option<String>,

    /// lit les adresses depuis stdin (une par ligne)
    #[arg(long, conflicts_with = "input")]
    pub stdin: bool,

    /// limite de sondes simultanées
    #[arg(long, default_value_t = 20)]
    pub concurrency: usize,

    /// taille des tranches traitées séquentiellement
    #[arg(long, value_name = "N")]
    pub chunk_size: Option<usize>,

    /// affiche l'avancement sur stderr
    #[arg(long)]
    pub progress: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct CommonArgs {
    /// fichier de domaines à rejeter (un par ligne, commentaires '#')
    #[arg(long, value_name = "FILE")]
    pub blacklist: Option<String>,

    /// mode de validation du local-part : strict|relaxed
    #[arg(long, default_value = "strict")]
    pub mode: String,

    /// timeout DNS et SMTP, en secondes
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// tentatives autorisées sur réponse transitoire (4xx)
    #[arg(long, default_value_t = 3)]
    pub attempts: u32,

    /// délai fixe entre tentatives, en secondes
    #[arg(long, default_value_t = 5)]
    pub backoff: u64,

    /// adresse annoncée dans MAIL FROM
    #[arg(long, value_name = "EMAIL")]
    pub sender: Option<String>,

    /// nom annoncé dans EHLO
    #[arg(long, value_name = "HOST")]
    pub helo: Option<String>,

    /// port SMTP des serveurs sondés
    #[arg(long, default_value_t = 25)]
    pub port: u16,

    /// nombre maximal de serveurs MX essayés par domaine
    #[arg(long, default_value_t = 3)]
    pub max_mx: usize,

    /// annote les échecs DNS quand le domaine a un enregistrement A
    #[arg(long)]
    pub a_fallback: bool,

    /// format de sortie : human|json|ndjson|csv
    #[arg(long, default_value = "human")]
    pub format: String,

    /// écrit le rapport dans un fichier (selon --format)
    #[arg(long, value_name = "FILE")]
    pub out: Option<String>,
}

impl CommonArgs {
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig {
            dns_timeout: Duration::from_secs(self.timeout),
            smtp_timeout: Duration::from_secs(self.timeout),
            smtp_port: self.port,
            max_exchangers: self.max_mx,
            retry_attempts: self.attempts,
            retry_backoff: Duration::from_secs(self.backoff),
            validation_mode: mode_from_str(&self.mode),
            a_record_fallback: self.a_fallback,
            ..EngineConfig::default()
        };
        if let Some(sender) = &self.sender {
            config.sender = sender.clone();
        }
        if let Some(helo) = &self.helo {
            config.helo_name = helo.clone();
        }
        config
    }
}

pub fn mode_from_str(value: &str) -> ValidationMode {
    match value.to_ascii_lowercase().as_str() {
        "relaxed" => ValidationMode::Relaxed,
        _ => ValidationMode::Strict,
    }
}
