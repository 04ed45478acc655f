use std::io;

fn main() -> io::Result<()> {
    remide::run()
}
