use dflow::driver;
use dflow_utils::DflowResult;

fn main() -> DflowResult<()> {
    driver::run_driver()
}
