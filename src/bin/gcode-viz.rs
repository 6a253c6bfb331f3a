use anyhow::Result;
use gcode_pathviz::app::run;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    run().await
}
