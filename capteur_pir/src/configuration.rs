use serde::{Deserialize, Serialize};

use crate::erreur::ErreurCapteur;

/// Cadence de lecture par défaut en millisecondes
pub const BOUCLE_PAR_DEFAUT: u64 = 1500;

/// Options du capteur : la broche est obligatoire, la cadence de lecture
/// est facultative
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub pin: Option<u8>,
    pub boucle: Option<u64>,
}

impl Configuration {
    pub fn nouvelle(pin: u8) -> Self {
        Self {
            pin: Some(pin),
            boucle: None,
        }
    }

    /// Lire une configuration depuis un document json
    pub fn depuis_json(texte: &str) -> Result<Self, ErreurCapteur> {
        let document: serde_json::Value = serde_json::from_str(texte)
            .map_err(|err| ErreurCapteur::ConfigurationIllisible(err.to_string()))?;

        if document.is_null() {
            return Err(ErreurCapteur::ConfigurationAbsente);
        }

        serde_json::from_value(document)
            .map_err(|err| ErreurCapteur::ConfigurationIllisible(err.to_string()))
    }

    // Une cadence absente ou nulle retombe sur la valeur par défaut.
    pub(crate) fn boucle_ou_defaut(&self) -> u64 {
        match self.boucle {
            Some(boucle) if boucle > 0 => boucle,
            _ => BOUCLE_PAR_DEFAUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nouvelle_sans_cadence_explicite() {
        let configuration = Configuration::nouvelle(12);

        assert_eq!(configuration.pin, Some(12));
        assert_eq!(configuration.boucle, None);
        assert_eq!(configuration.boucle_ou_defaut(), 1500);
    }

    #[test]
    fn cadence_fournie_conservee() {
        let configuration = Configuration {
            pin: Some(12),
            boucle: Some(1000),
        };

        assert_eq!(configuration.boucle_ou_defaut(), 1000);
    }

    #[test]
    fn cadence_nulle_retombe_sur_la_valeur_par_defaut() {
        let configuration = Configuration {
            pin: Some(12),
            boucle: Some(0),
        };

        assert_eq!(configuration.boucle_ou_defaut(), 1500);
    }

    #[test]
    fn depuis_json_lit_les_deux_champs() {
        let configuration = Configuration::depuis_json(r#"{"pin": 12, "boucle": 1000}"#).unwrap();

        assert_eq!(configuration.pin, Some(12));
        assert_eq!(configuration.boucle, Some(1000));
    }

    #[test]
    fn depuis_json_tolere_les_champs_inconnus() {
        let configuration =
            Configuration::depuis_json(r#"{"pin": 7, "nom": "entrée"}"#).unwrap();

        assert_eq!(configuration.pin, Some(7));
    }

    #[test]
    fn depuis_json_null_signale_une_configuration_absente() {
        let erreur = Configuration::depuis_json("null").err().expect("erreur attendue");

        assert!(matches!(erreur, ErreurCapteur::ConfigurationAbsente));
    }

    #[test]
    fn depuis_json_malforme_signale_une_configuration_illisible() {
        let erreur = Configuration::depuis_json("{pin:").err().expect("erreur attendue");

        assert!(matches!(erreur, ErreurCapteur::ConfigurationIllisible(_)));
    }
}
