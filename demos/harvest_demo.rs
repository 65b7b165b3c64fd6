use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    question_triples::example_apps::run_harvest_demo(std::env::args().skip(1))
}
