use clap::{Parser, Subcommand};
use tonic::transport::Channel;
use tonic::Code;
use workshop_core::blog::blog_service_client::BlogServiceClient;
use workshop_core::blog::{
    Blog, CreateBlogRequest, DeleteBlogRequest, ListBlogRequest, ReadBlogRequest, UpdateBlogRequest,
};

#[derive(Parser, Debug)]
#[command(name = "blog-client", version, about = "Demo client for the blog service")]
struct Cli {
    /// Server endpoint.
    #[arg(long, env = "SERVER_URL", default_value = "http://127.0.0.1:50051")]
    addr: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a blog post and print its assigned id.
    Create {
        #[arg(long, default_value = "ada")]
        author_id: String,
        #[arg(long, default_value = "My first blog")]
        title: String,
        #[arg(long, default_value = "Content of the first blog")]
        content: String,
    },
    /// Read a blog post by id.
    Read { blog_id: String },
    /// Replace the fields of an existing blog post.
    Update {
        blog_id: String,
        #[arg(long, default_value = "ada")]
        author_id: String,
        #[arg(long, default_value = "Edited title")]
        title: String,
        #[arg(long, default_value = "Edited content")]
        content: String,
    },
    /// Delete a blog post by id.
    Delete { blog_id: String },
    /// Stream every stored blog post.
    List,
    /// Full lifecycle walkthrough: create, read, update, delete, list.
    Demo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut client = BlogServiceClient::connect(cli.addr.clone()).await?;

    match cli.command {
        Command::Create {
            author_id,
            title,
            content,
        } => {
            let blog = create(&mut client, author_id, title, content).await?;
            println!("created blog {}", blog.id);
        }
        Command::Read { blog_id } => read(&mut client, blog_id).await?,
        Command::Update {
            blog_id,
            author_id,
            title,
            content,
        } => {
            let response = client
                .update_blog(UpdateBlogRequest {
                    blog: Some(Blog {
                        id: blog_id,
                        author_id,
                        title,
                        content,
                    }),
                })
                .await?;
            println!("updated: {:?}", response.into_inner().blog);
        }
        Command::Delete { blog_id } => {
            let response = client.delete_blog(DeleteBlogRequest { blog_id }).await?;
            println!("deleted blog {}", response.into_inner().blog_id);
        }
        Command::List => list(&mut client).await?,
        Command::Demo => demo(&mut client).await?,
    }

    Ok(())
}

async fn create(
    client: &mut BlogServiceClient<Channel>,
    author_id: String,
    title: String,
    content: String,
) -> anyhow::Result<Blog> {
    let response = client
        .create_blog(CreateBlogRequest {
            blog: Some(Blog {
                id: String::new(),
                author_id,
                title,
                content,
            }),
        })
        .await?;

    response
        .into_inner()
        .blog
        .ok_or_else(|| anyhow::anyhow!("create response carried no blog"))
}

async fn read(client: &mut BlogServiceClient<Channel>, blog_id: String) -> anyhow::Result<()> {
    match client.read_blog(ReadBlogRequest { blog_id }).await {
        Ok(response) => println!("read: {:?}", response.into_inner().blog),
        Err(status) if status.code() == Code::NotFound => println!("blog not found"),
        Err(status) => return Err(status.into()),
    }
    Ok(())
}

async fn list(client: &mut BlogServiceClient<Channel>) -> anyhow::Result<()> {
    let mut stream = client.list_blog(ListBlogRequest {}).await?.into_inner();

    while let Some(response) = stream.message().await? {
        println!("blog: {:?}", response.blog);
    }
    println!("reached end of stream");
    Ok(())
}

async fn demo(client: &mut BlogServiceClient<Channel>) -> anyhow::Result<()> {
    let created = create(
        &mut *client,
        "ada".to_string(),
        "My first blog".to_string(),
        "Content of the first blog".to_string(),
    )
    .await?;
    println!("created blog {}", created.id);

    // A read with a garbage id demonstrates the InvalidArgument path.
    if let Err(status) = client
        .read_blog(ReadBlogRequest {
            blog_id: "not-a-real-id".to_string(),
        })
        .await
    {
        println!("read with bad id failed as expected: {}", status.code());
    }

    read(&mut *client, created.id.clone()).await?;

    let response = client
        .update_blog(UpdateBlogRequest {
            blog: Some(Blog {
                id: created.id.clone(),
                author_id: created.author_id.clone(),
                title: "Edited title".to_string(),
                content: "Edited content".to_string(),
            }),
        })
        .await?;
    println!("updated: {:?}", response.into_inner().blog);

    let response = client
        .delete_blog(DeleteBlogRequest {
            blog_id: created.id.clone(),
        })
        .await?;
    println!("deleted blog {}", response.into_inner().blog_id);

    list(&mut *client).await
}
