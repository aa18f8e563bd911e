//! Command-line argument parsing

/// Usage text printed on argument errors
pub const USAGE: &str = "\
usage: blockcity [--config <path>] <command>

commands:
  authorize-url <return_url>            print the OAuth consent URL
  token <auth_code>                     exchange an authorization code
  user <access_token> [endpoint_url]    fetch the user's base info
  pay <biz_content> <notify_url>        create a payment order
  verify <file|->                       check a callback's signature";

/// A parsed subcommand
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    AuthorizeUrl {
        return_url: String,
    },
    Token {
        auth_code: String,
    },
    User {
        access_token: String,
        endpoint_url: Option<String>,
    },
    Pay {
        biz_content: String,
        notify_url: String,
    },
    /// Callback body from a file path, or stdin for `-`
    Verify {
        source: String,
    },
}

/// Parsed command line
#[derive(Debug, PartialEq, Eq)]
pub struct Args {
    pub config: Option<String>,
    pub command: Command,
}

/// Parse arguments (without the program name).
///
/// `--config <path>` may appear anywhere; everything else is positional.
pub fn parse(args: &[String]) -> Result<Args, String> {
    let mut config = None;
    let mut positional = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter.next().ok_or("--config requires a path")?;
            config = Some(path.clone());
        } else {
            positional.push(arg.as_str());
        }
    }

    let command = match positional.as_slice() {
        ["authorize-url", return_url] => Command::AuthorizeUrl {
            return_url: (*return_url).to_owned(),
        },
        ["token", auth_code] => Command::Token {
            auth_code: (*auth_code).to_owned(),
        },
        ["user", access_token] => Command::User {
            access_token: (*access_token).to_owned(),
            endpoint_url: None,
        },
        ["user", access_token, endpoint_url] => Command::User {
            access_token: (*access_token).to_owned(),
            endpoint_url: Some((*endpoint_url).to_owned()),
        },
        ["pay", biz_content, notify_url] => Command::Pay {
            biz_content: (*biz_content).to_owned(),
            notify_url: (*notify_url).to_owned(),
        },
        ["verify", source] => Command::Verify {
            source: (*source).to_owned(),
        },
        [] => return Err("missing command".into()),
        [name, ..] => return Err(format!("unknown command or wrong arguments: {name}")),
    };

    Ok(Args { config, command })
}
