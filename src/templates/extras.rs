//! Management command and service skeletons.

use super::fill;

const COMMAND_MODULE: &str = r#"from django.core.management.base import BaseCommand, CommandError


class Command(BaseCommand):
    help = '{{HELP}}'

    def add_arguments(self, parser):
        # parser.add_argument('ids', nargs='+', type=int)
        pass

    def handle(self, *args, **options):
        self.stdout.write(self.style.SUCCESS('{{NAME}} finished'))
"#;

pub fn command_module(name: &str, help: &str) -> String {
    let help = help.replace('\'', "\\'");
    fill(COMMAND_MODULE, &[("NAME", name), ("HELP", help.as_str())])
}

pub const SERVICES_HEADER: &str = "\"\"\"Business logic kept out of views and models.\"\"\"\n\nfrom django.db import transaction\n";

const SERVICE_CLASS: &str = r#"

class {{NAME}}Service:
    """Operations for {{NAME}}."""

    @staticmethod
    @transaction.atomic
    def execute(*args, **kwargs):
        raise NotImplementedError('{{NAME}}Service.execute')
"#;

pub fn service_class(name: &str) -> String {
    fill(SERVICE_CLASS, &[("NAME", name)])
}

/// Declaration line used to detect an existing service
pub fn service_declaration(name: &str) -> String {
    format!("class {}Service", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_module_escapes_help() {
        let module = command_module("import_students", "Import the school's students");
        assert!(module.contains("help = 'Import the school\\'s students'"));
        assert!(module.contains("SUCCESS('import_students finished')"));
    }

    #[test]
    fn test_service_class() {
        let class = service_class("Enrollment");
        assert!(class.starts_with("\n\nclass EnrollmentService:\n"));
        assert!(class.contains(&service_declaration("Enrollment")));
    }
}
