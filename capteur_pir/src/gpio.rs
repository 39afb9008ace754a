use std::collections::HashMap;

use rppal::gpio::{Gpio, InputPin, Level};

use crate::erreur::ErreurCapteur;

/// Schéma de numérotation des broches
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeAdressage {
    /// Positions sur le connecteur physique à 40 broches
    #[default]
    Physique,
    /// Numéros gpio du SoC Broadcom
    Bcm,
}

// Connecteur J8 : position physique -> gpio Broadcom. Les broches
// d'alimentation et de masse n'ont pas de correspondance.
const CORRESPONDANCE_PHYSIQUE_BCM: [(u8, u8); 26] = [
    (3, 2),
    (5, 3),
    (7, 4),
    (8, 14),
    (10, 15),
    (11, 17),
    (12, 18),
    (13, 27),
    (15, 22),
    (16, 23),
    (18, 24),
    (19, 10),
    (21, 9),
    (22, 25),
    (23, 11),
    (24, 8),
    (26, 7),
    (29, 5),
    (31, 6),
    (32, 12),
    (33, 13),
    (35, 19),
    (36, 16),
    (37, 26),
    (38, 20),
    (40, 21),
];

impl ModeAdressage {
    /// Convertir un numéro de broche du mode courant vers le numéro gpio Broadcom
    pub fn convertir(self, pin: u8) -> Result<u8, ErreurCapteur> {
        match self {
            ModeAdressage::Bcm => Ok(pin),
            ModeAdressage::Physique => CORRESPONDANCE_PHYSIQUE_BCM
                .iter()
                .find(|(physique, _)| *physique == pin)
                .map(|(_, bcm)| *bcm)
                .ok_or(ErreurCapteur::PinInvalide(pin)),
        }
    }
}

/// Accès aux broches gpio : mode d'adressage, configuration en entrée et
/// lecture. Le capteur ne touche jamais au matériel directement.
pub trait InterfaceGpio {
    fn configurer_mode_adressage(&mut self, mode: ModeAdressage);

    fn configurer_entree(&mut self, pin: u8) -> Result<(), ErreurCapteur>;

    fn lire(&mut self, pin: u8) -> Result<bool, ErreurCapteur>;
}

/// Implémentation rppal pour le Raspberry Pi
pub struct GpioRaspberry {
    gpio: Gpio,
    mode: ModeAdressage,
    entrees: HashMap<u8, InputPin>,
}

impl GpioRaspberry {
    pub fn nouvelle() -> Result<Self, ErreurCapteur> {
        Ok(Self {
            gpio: Gpio::new()?,
            mode: ModeAdressage::default(),
            entrees: HashMap::new(),
        })
    }
}

impl InterfaceGpio for GpioRaspberry {
    fn configurer_mode_adressage(&mut self, mode: ModeAdressage) {
        if self.mode != mode && !self.entrees.is_empty() {
            // Les broches déjà configurées l'ont été dans l'ancien mode.
            self.entrees.clear();
        }
        self.mode = mode;
    }

    fn configurer_entree(&mut self, pin: u8) -> Result<(), ErreurCapteur> {
        let bcm = self.mode.convertir(pin)?;
        let entree = self.gpio.get(bcm)?.into_input();
        log::debug!("Broche {pin} (gpio {bcm}) configurée en entrée");
        self.entrees.insert(pin, entree);
        Ok(())
    }

    fn lire(&mut self, pin: u8) -> Result<bool, ErreurCapteur> {
        // Une broche jamais configurée l'est à la première lecture.
        if !self.entrees.contains_key(&pin) {
            self.configurer_entree(pin)?;
        }

        let entree = self.entrees.get(&pin).expect("entrée configurée");
        Ok(entree.read() == Level::High)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_physique_convertit_vers_le_gpio_broadcom() {
        assert_eq!(ModeAdressage::Physique.convertir(7).unwrap(), 4);
        assert_eq!(ModeAdressage::Physique.convertir(11).unwrap(), 17);
        assert_eq!(ModeAdressage::Physique.convertir(40).unwrap(), 21);
    }

    #[test]
    fn mode_physique_rejette_les_broches_sans_gpio() {
        // 6 est une masse, 41 est hors du connecteur
        assert!(matches!(
            ModeAdressage::Physique.convertir(6),
            Err(ErreurCapteur::PinInvalide(6))
        ));
        assert!(matches!(
            ModeAdressage::Physique.convertir(41),
            Err(ErreurCapteur::PinInvalide(41))
        ));
    }

    #[test]
    fn mode_bcm_conserve_le_numero() {
        assert_eq!(ModeAdressage::Bcm.convertir(18).unwrap(), 18);
    }
}
