use std::path::PathBuf;

use clap::Parser;
use postboard_client::{PostChanges, PostboardClient};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[clap(name = "postboard", about = "Command-line client for a postboard server")]
struct Cli {
    #[clap(short, long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Where the session token is kept between invocations.
    #[clap(long, default_value = ".postboard_session")]
    token_file: PathBuf,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    Register {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
        #[clap(long)]
        password_confirmation: Option<String>,
    },
    SignIn {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    SignOut,
    List {
        #[clap(long)]
        user_id: Option<Uuid>,
        #[clap(long)]
        limit: Option<u32>,
        #[clap(long)]
        offset: Option<u32>,
    },
    Show {
        id: Uuid,
    },
    Create {
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        description: Option<String>,
        #[clap(long)]
        image: Option<String>,
    },
    Update {
        id: Uuid,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        description: Option<String>,
        #[clap(long)]
        image: Option<String>,
    },
    Delete {
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let mut client = PostboardClient::connect(&args.server)?.with_token_file(&args.token_file)?;

    match args.command {
        Command::Register {
            email,
            password,
            password_confirmation,
        } => {
            let auth = client
                .register(&email, &password, password_confirmation.as_deref())
                .await?;
            println!("Registered and signed in as {} ({})", auth.user.email, auth.user.id);
        }
        Command::SignIn { email, password } => {
            let auth = client.sign_in(&email, &password).await?;
            println!("Signed in as {} ({})", auth.user.email, auth.user.id);
        }
        Command::SignOut => {
            client.sign_out().await?;
            println!("Signed out");
        }
        Command::List {
            user_id,
            limit,
            offset,
        } => {
            let posts = client.list_posts(user_id, limit, offset).await?;
            println!("Posts ({})", posts.len());
            for post in posts {
                println!(
                    "- [{}] {} (by {})",
                    post.id,
                    post.title.as_deref().unwrap_or("(untitled)"),
                    post.user_id
                );
            }
        }
        Command::Show { id } => {
            let post = client.get_post(id).await?;
            println!("{post}");
        }
        Command::Create {
            title,
            description,
            image,
        } => {
            let post = client
                .create_post(&PostChanges {
                    title,
                    description,
                    image,
                })
                .await?;
            println!("Post created! ID: {}", post.id);
        }
        Command::Update {
            id,
            title,
            description,
            image,
        } => {
            let post = client
                .update_post(
                    id,
                    &PostChanges {
                        title,
                        description,
                        image,
                    },
                )
                .await?;
            println!("Post updated: {post}");
        }
        Command::Delete { id } => {
            client.delete_post(id).await?;
            println!("Post deleted!");
        }
    }

    Ok(())
}
