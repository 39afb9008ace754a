// Tester cargo run --example detecter_mouvement

use std::{
    env,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use capteur_pir::{
    configuration::Configuration, detecteur_mouvement::CapteurPir, gpio::GpioRaspberry,
};
use tokio::time::timeout;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let arret_demande = Arc::new(AtomicBool::new(false));
    let arret_demande_clone = arret_demande.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        log::info!("Détection de mouvement : arrêt demandé");
        arret_demande_clone.store(true, Ordering::SeqCst);
    });

    // Capteur PIR branché sur la broche physique 7 (gpio 4)
    let configuration = Configuration::depuis_json(r#"{"pin": 7, "boucle": 500}"#)?;
    let gpio = GpioRaspberry::nouvelle()?;
    let mut capteur = CapteurPir::nouveau(&configuration, gpio)?;
    let mouvements = capteur.abonner_mouvement();

    capteur.demarrer().await?;
    log::info!("Surveillance de la broche {}", capteur.pin());

    while !arret_demande.load(Ordering::SeqCst) {
        match timeout(Duration::from_millis(500), mouvements.recv_async()).await {
            Ok(Ok(())) => {
                log::info!("Mouvement détecté à {:?}", capteur.dernier_mouvement());
            }
            Ok(Err(_)) => break,
            Err(_) => {}
        }
    }

    capteur.arreter();
    log::info!("Surveillance terminée");
    Ok(())
}
