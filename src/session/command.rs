//! Console verbs and their help/usage contract.

/// Verbs understood by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    List,
    Add,
    Update,
    Remove,
    Check,
    Type,
    Set,
    Print,
    Defaults,
    History,
    Version,
    Help,
    Exit,
}

/// Help entry for one verb.
#[derive(Debug, Clone, Copy)]
pub struct VerbHelp {
    pub verb: Verb,
    pub name: &'static str,
    pub summary: &'static str,
    /// Usage hint shown after "Wrong arguments. Use".
    pub usage: &'static str,
    pub details: &'static str,
}

pub const VERBS: &[VerbHelp] = &[
    VerbHelp {
        verb: Verb::Add,
        name: "add",
        summary: "Add phone in redirection service",
        usage: "'add mac_address target_url'",
        details: "'add <mac> <url>' add redirection to <url> for mac address <mac> (Eg. \"add 000413XXXXXX http://server.example.com\")\n\
                  in case the <url> param is missing the default url value will be used (see the 'defaults' command)",
    },
    VerbHelp {
        verb: Verb::Check,
        name: "check",
        summary: "Verify redirection for a specific mac address",
        usage: "'check MAC_Address'",
        details: "'check <mac>' verify redirection for mac address <mac> (Eg. \"check 000413XXXXXX\")",
    },
    VerbHelp {
        verb: Verb::Defaults,
        name: "defaults",
        summary: "Manage default settings",
        usage: "'defaults [name] [value]' or 'defaults print'.",
        details: "'defaults print' print current defaults setting\n\
                  'defaults store' store all current settings in configuration file\n\
                  'defaults <setting>' clear a single setting and store the configuration file\n\
                  'defaults <setting> <value>' store single setting in configuration file",
    },
    VerbHelp {
        verb: Verb::Exit,
        name: "exit",
        summary: "Exits from the console",
        usage: "'exit'",
        details: "'exit' leave the console (end of input does the same)",
    },
    VerbHelp {
        verb: Verb::Help,
        name: "help",
        summary: "Get help on commands",
        usage: "'help [command]'",
        details: "'help' or '?' with no arguments prints a list of commands\n\
                  'help <command>' or '? <command>' gives help on <command>",
    },
    VerbHelp {
        verb: Verb::History,
        name: "history",
        summary: "Print a list of commands that have been entered",
        usage: "'history'",
        details: "'history' print every command entered in this session",
    },
    VerbHelp {
        verb: Verb::List,
        name: "list",
        summary: "List phones configured in redirection service",
        usage: "'list phonetype [url]' or 'list all'",
        details: "'list all' list all phones\n\
                  'list <phone_type>' list only phones matching <phone_type> (Eg. \"list snom370\")\n\
                  'list <phone_type> <url>' list only phones matching <phone_type> and <url> (Eg. \"list snom370 http://server.example.com/\")",
    },
    VerbHelp {
        verb: Verb::Print,
        name: "print",
        summary: "Print local variables",
        usage: "'print var_name' or 'print all'",
        details: "'print all' print all defined variables\n\
                  'print <var_name>' print local variable <var_name>",
    },
    VerbHelp {
        verb: Verb::Remove,
        name: "remove",
        summary: "Remove phone from redirection service",
        usage: "'remove mac_address'",
        details: "'remove <mac>' remove redirection for mac address <mac> (Eg. \"remove 000413XXXXXX\")",
    },
    VerbHelp {
        verb: Verb::Set,
        name: "set",
        summary: "Set a variable value",
        usage: "'set <var_name> <value>'",
        details: "'set <var_name> <value>' set a variable <var_name> to value <value> (Eg. \"set server http://my.server.example.com/provscript.php\")\n\
                  reference it in any later command as %<var_name>",
    },
    VerbHelp {
        verb: Verb::Type,
        name: "type",
        summary: "Get the device type of a given mac address",
        usage: "'type mac_address [mac_address ...]'",
        details: "'type <mac>' returns the device type of the mac address <mac>",
    },
    VerbHelp {
        verb: Verb::Update,
        name: "update",
        summary: "Update phones in redirection service",
        usage: "'update mac_address target_url'",
        details: "'update <mac> <url>' modify redirection to <url> for mac address <mac> (Eg. \"update 000413XXXXXX http://server.example.com\")\n\
                  the phone is deregistered first; if registering the new target fails it stays deregistered",
    },
    VerbHelp {
        verb: Verb::Version,
        name: "version",
        summary: "Print the software version",
        usage: "'version'",
        details: "'version' print the software version",
    },
];

impl Verb {
    /// Look a verb up by its typed name. `?` is an alias of `help`.
    pub fn parse(token: &str) -> Option<Verb> {
        if token == "?" {
            return Some(Verb::Help);
        }
        VERBS.iter().find(|entry| entry.name == token).map(|entry| entry.verb)
    }

    pub fn entry(&self) -> &'static VerbHelp {
        VERBS
            .iter()
            .find(|entry| entry.verb == *self)
            .unwrap_or(&VERBS[0])
    }

    pub fn name(&self) -> &'static str {
        self.entry().name
    }

    pub fn usage(&self) -> &'static str {
        self.entry().usage
    }
}
