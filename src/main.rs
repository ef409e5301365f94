fn main() -> std::io::Result<()> {
    databuddy_lib::run()
}
