fn main() {
    kmsfb::cli::main();
}
