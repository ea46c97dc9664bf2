use klf200_frame::FrameRegistry;

use crate::cmd::{CommandsArgs, Context};
use crate::exit::{CliResult, SUCCESS};
use crate::output::print_commands;

pub fn run(args: CommandsArgs, ctx: Context) -> CliResult<i32> {
    let registry = FrameRegistry::global();
    let rows: Vec<_> = registry
        .commands()
        .into_iter()
        .filter(|command| !args.requests || command.is_request())
        .filter_map(|command| {
            registry
                .get(command.id())
                .map(|registration| (command, registration.length))
        })
        .collect();

    print_commands(&rows, ctx.format);
    Ok(SUCCESS)
}
