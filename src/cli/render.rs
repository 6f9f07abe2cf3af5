use tokio::io::AsyncReadExt;
use crate::cli::commands::RenderArgs;
use crate::errors::AgunblockError;
use crate::markdown;

pub async fn handle_render(args: RenderArgs) -> Result<(), AgunblockError> {
    let (title, source) = if args.input == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        ("Setup instructions".to_string(), buf)
    } else {
        let content = tokio::fs::read_to_string(&args.input).await?;
        (args.input.clone(), content)
    };

    if args.document {
        print!("{}", markdown::render_document(&title, &source));
    } else {
        println!("{}", markdown::render(&source));
    }
    Ok(())
}
