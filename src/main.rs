use relay_bench::error::AppResult;

fn main() -> AppResult<()> {
    relay_bench::run()
}
