fn main() {
    println!("Lancer un exemple : cargo run --example detecter_mouvement");
}
