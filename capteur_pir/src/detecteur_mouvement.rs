use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use flume::{Receiver, Sender};
use tokio::task::JoinHandle;
use tokio::time;

use crate::configuration::Configuration;
use crate::erreur::ErreurCapteur;
use crate::gpio::{InterfaceGpio, ModeAdressage};

struct EtatCapteur {
    mouvement: bool,
    dernier_mouvement: Option<SystemTime>,
    abonnes: Vec<Sender<()>>,
}

/// Capteur infrarouge passif branché sur une broche gpio.
///
/// Le capteur lit la broche à cadence fixe et publie une notification à
/// chaque front montant (absence de mouvement -> mouvement). Le front
/// descendant est silencieux.
pub struct CapteurPir<G: InterfaceGpio + Send + 'static> {
    pin: u8,
    boucle: Duration,
    gpio: Arc<Mutex<G>>,
    etat: Arc<Mutex<EtatCapteur>>,
    poignee: Option<JoinHandle<()>>,
}

impl<G: InterfaceGpio + Send + 'static> CapteurPir<G> {
    pub fn nouveau(configuration: &Configuration, gpio: G) -> Result<Self, ErreurCapteur> {
        let pin = configuration.pin.ok_or(ErreurCapteur::ChampPinManquant)?;

        Ok(Self {
            pin,
            boucle: Duration::from_millis(configuration.boucle_ou_defaut()),
            gpio: Arc::new(Mutex::new(gpio)),
            etat: Arc::new(Mutex::new(EtatCapteur {
                mouvement: false,
                dernier_mouvement: None,
                abonnes: Vec::new(),
            })),
            poignee: None,
        })
    }

    /// Configurer la broche en entrée puis lancer la lecture périodique.
    ///
    /// Un capteur déjà démarré est d'abord arrêté : le redémarrage remplace
    /// la minuterie précédente.
    pub async fn demarrer(&mut self) -> Result<(), ErreurCapteur> {
        if self.poignee.is_some() {
            self.arreter();
        }

        let preparation = {
            let mut gpio = self.gpio.lock().expect("verrou gpio");
            gpio.configurer_mode_adressage(ModeAdressage::Physique);
            gpio.configurer_entree(self.pin)
        };

        if let Err(err) = preparation {
            log::error!(
                "Erreur lors de la configuration de la broche {} : {err}",
                self.pin
            );
            return Err(err);
        }

        let gpio = self.gpio.clone();
        let etat = self.etat.clone();
        let pin = self.pin;
        let boucle = self.boucle;
        self.poignee = Some(tokio::spawn(async move {
            loop {
                time::sleep(boucle).await;
                Self::comparer_lecture(&gpio, &etat, pin);
            }
        }));

        log::info!(
            "Détection de mouvement démarrée sur la broche {} toutes les {} ms",
            self.pin,
            self.boucle.as_millis()
        );
        Ok(())
    }

    /// Annuler la lecture périodique. Renvoie `false` si le capteur
    /// n'était pas démarré.
    pub fn arreter(&mut self) -> bool {
        match self.poignee.take() {
            Some(poignee) => {
                poignee.abort();
                log::info!("Détection de mouvement arrêtée sur la broche {}", self.pin);
                true
            }
            None => false,
        }
    }

    /// Une lecture de la broche suivie de la comparaison avec l'état courant.
    /// Appelée à chaque échéance de la boucle, utilisable aussi directement.
    pub fn lire_pir(&self) {
        Self::comparer_lecture(&self.gpio, &self.etat, self.pin);
    }

    // Une lecture ratée ne change rien : la prochaine échéance de la boucle
    // sert de nouvelle tentative.
    fn comparer_lecture(gpio: &Mutex<G>, etat: &Mutex<EtatCapteur>, pin: u8) {
        let lecture = gpio.lock().expect("verrou gpio").lire(pin);

        let valeur = match lecture {
            Ok(valeur) => valeur,
            Err(_) => return,
        };

        let mut etat = etat.lock().expect("verrou état");
        if valeur == etat.mouvement {
            return;
        }

        etat.mouvement = valeur;
        if etat.mouvement {
            etat.dernier_mouvement = Some(SystemTime::now());
            log::debug!("Mouvement détecté sur la broche {pin}");
            for abonne in &etat.abonnes {
                // Un abonné dont le récepteur a disparu est ignoré.
                let _ = abonne.send(());
            }
        }
    }

    /// S'abonner aux notifications de mouvement. Les abonnés sont notifiés
    /// dans l'ordre d'inscription, une fois par front montant.
    pub fn abonner_mouvement(&self) -> Receiver<()> {
        let (tx, rx) = flume::unbounded();
        self.etat.lock().expect("verrou état").abonnes.push(tx);
        rx
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn boucle(&self) -> Duration {
        self.boucle
    }

    /// Dernier état lu sur la broche
    pub fn mouvement(&self) -> bool {
        self.etat.lock().expect("verrou état").mouvement
    }

    /// Heure du dernier front montant, conservée après le retour au repos
    pub fn dernier_mouvement(&self) -> Option<SystemTime> {
        self.etat.lock().expect("verrou état").dernier_mouvement
    }

    pub fn actif(&self) -> bool {
        self.poignee.is_some()
    }
}

impl<G: InterfaceGpio + Send + 'static> Drop for CapteurPir<G> {
    fn drop(&mut self) {
        self.arreter();
    }
}
