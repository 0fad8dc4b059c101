fn main() {
    std::process::exit(tt_cli::run_cli_from_args(std::env::args_os()));
}
