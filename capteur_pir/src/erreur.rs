use thiserror::Error;

/// Erreurs du capteur, de sa configuration et de son interface gpio
#[derive(Debug, Error)]
pub enum ErreurCapteur {
    // Message d'origine conservé : les appelants existants le comparent tel quel.
    #[error("field pin is required and missing")]
    ChampPinManquant,

    #[error("la configuration est absente")]
    ConfigurationAbsente,

    #[error("la configuration est illisible : {0}")]
    ConfigurationIllisible(String),

    #[error("la broche physique {0} n'a pas de gpio correspondant")]
    PinInvalide(u8),

    #[error("gpio : {0}")]
    Gpio(#[from] rppal::gpio::Error),
}
