use crate::cmd::DescribeArgs;
use crate::demo::ping_prototype;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{hex_string, print_prototype, OutputFormat};

pub fn run(args: DescribeArgs, format: OutputFormat) -> CliResult<i32> {
    let proto = ping_prototype();
    print_prototype(&proto, format);

    if args.hex {
        println!("{}", hex_string(&proto.serialize_format()));
    }

    Ok(SUCCESS)
}
