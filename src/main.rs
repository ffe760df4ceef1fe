fn main() {
    if let Err(err) = jirai_layout::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
