//! Account-shared stack: log and storage buckets, audit trail and master key.

use tracing::info;
use wimpy_template::{
    values, Condition, Expr, MappingTable, Output, PolicyDocument, Principal, Properties, Pseudo,
    Resource, Statement, Tags, Template, Value, DEFAULT_FORMAT_VERSION,
};

use crate::error::StackResult;

const DESCRIPTION: &str =
    "Stack that creates resources shared for all applications inside your AWS account";

const CLOUDTRAIL_SERVICE: &str = "cloudtrail.amazonaws.com";

/// Account ids that deliver ELB access logs, per region.
pub const ELB_LOG_PRINCIPALS: [(&str, &str); 14] = [
    ("ap-northeast-1", "582318560864"),
    ("ap-northeast-2", "600734575887"),
    ("ap-southeast-1", "114774131450"),
    ("ap-southeast-2", "783225319266"),
    ("ap-south-1", "718504428378"),
    ("ca-central-1", "985666609251"),
    ("eu-west-1", "156460612806"),
    ("eu-west-2", "652711504416"),
    ("eu-central-1", "054676820928"),
    ("sa-east-1", "507241528517"),
    ("us-west-1", "027434742980"),
    ("us-west-2", "797873946194"),
    ("us-east-1", "127311923021"),
    ("us-east-2", "033677994240"),
];

fn log_bucket_arn(suffix: &[&str]) -> Expr {
    let mut parts = values!["arn:aws:s3:::", Expr::reference("LogBucket")];
    parts.extend(suffix.iter().map(|s| Value::from(*s)));
    Expr::join("", parts)
}

fn cloudtrail_arn_pattern() -> Expr {
    Expr::join(
        "",
        values!["arn:aws:cloudtrail:*:", Pseudo::AccountId, ":trail/*"],
    )
}

fn managed_tags(name: &str) -> Tags {
    Tags::new()
        .with("Name", Expr::join(" ", values![Pseudo::StackName, name]))
        .with("Managed", "Wimpy")
}

fn log_bucket_policy() -> PolicyDocument {
    PolicyDocument::new()
        .statement(
            Statement::allow()
                .sid("AWSCloudTrailAclCheck")
                .principal(Principal::service(CLOUDTRAIL_SERVICE))
                .action("s3:GetBucketAcl")
                .resource(log_bucket_arn(&[])),
        )
        .statement(
            Statement::allow()
                .sid("AWSCloudTrailWrite")
                .principal(Principal::service(CLOUDTRAIL_SERVICE))
                .action("s3:PutObject")
                .resource(Expr::join(
                    "",
                    values![
                        "arn:aws:s3:::",
                        Expr::reference("LogBucket"),
                        "/AWSLogs/",
                        Pseudo::AccountId,
                        "/*"
                    ],
                ))
                .condition(Condition::new().with(
                    "StringEquals",
                    "s3:x-amz-acl",
                    "bucket-owner-full-control",
                )),
        )
        .statement(
            Statement::allow()
                .sid("AWSELBLogWrite")
                .principal(Principal::aws(values![Expr::find_in_map(
                    "Principals",
                    Pseudo::Region,
                    "ELB"
                )]))
                .action("s3:PutObject")
                .resource(log_bucket_arn(&["/ELBLogs/*"])),
        )
}

fn cloudtrail_role_policy() -> PolicyDocument {
    let log_group_arn = || values![Expr::get_att("CloudTrailLogs", "Arn")];

    PolicyDocument::new()
        .statement(
            Statement::allow()
                .sid("AWSCloudTrailCreateLogStream2014110")
                .action(vec!["logs:CreateLogStream"])
                .resource(log_group_arn()),
        )
        .statement(
            Statement::allow()
                .sid("AWSCloudTrailPutLogEvents20141101")
                .action(vec!["logs:PutLogEvents"])
                .resource(log_group_arn()),
        )
}

fn decrypt_logs_statement(sid: &str) -> Statement {
    Statement::allow()
        .sid(sid)
        .principal(Principal::aws("*"))
        .action(vec!["kms:Decrypt", "kms:ReEncryptFrom"])
        .resource("*")
        .condition(
            Condition::new()
                .with("StringEquals", "kms:CallerAccount", Pseudo::AccountId)
                .with(
                    "StringLike",
                    "kms:EncryptionContext:aws:cloudtrail:arn",
                    cloudtrail_arn_pattern(),
                ),
        )
}

fn master_key_policy() -> PolicyDocument {
    PolicyDocument::new()
        .statement(
            Statement::allow()
                .sid("Enable IAM User Permissions")
                .principal(Principal::aws(Expr::join(
                    ":",
                    values!["arn:aws:iam:", Pseudo::AccountId, "root"],
                )))
                .action("kms:*")
                .resource("*"),
        )
        .statement(
            Statement::allow()
                .sid("Allow CloudTrail to encrypt logs")
                .principal(Principal::service(vec![CLOUDTRAIL_SERVICE]))
                .action("kms:GenerateDataKey*")
                .resource("*")
                .condition(Condition::new().with(
                    "StringLike",
                    "kms:EncryptionContext:aws:cloudtrail:arn",
                    cloudtrail_arn_pattern(),
                )),
        )
        .statement(
            Statement::allow()
                .sid("Allow CloudTrail to describe key")
                .principal(Principal::service(vec![CLOUDTRAIL_SERVICE]))
                .action("kms:DescribeKey")
                .resource("*"),
        )
        .statement(decrypt_logs_statement(
            "Allow principals in the account to decrypt log files",
        ))
        .statement(
            Statement::allow()
                .sid("Allow alias creation during setup")
                .principal(Principal::aws("*"))
                .action("kms:CreateAlias")
                .resource("*")
                .condition(
                    Condition::new()
                        .with(
                            "StringEquals",
                            "kms:ViaService",
                            Expr::join(".", values!["ec2", Pseudo::Region, "amazonaws.com"]),
                        )
                        .with("StringEquals", "kms:CallerAccount", Pseudo::AccountId),
                ),
        )
        .statement(decrypt_logs_statement("Enable cross account log decryption"))
}

/// Build the template shared by every application in the account.
pub fn build_account_template() -> StackResult<Template> {
    let mut t = Template::new();
    t.set_version(DEFAULT_FORMAT_VERSION);
    t.set_description(DESCRIPTION);

    let principals = ELB_LOG_PRINCIPALS
        .iter()
        .fold(MappingTable::new(), |table, (region, account)| {
            table.with_entry(*region, "ELB", *account)
        });
    t.add_mapping("Principals", principals)?;

    // Log delivery ACL lets S3 write its own access logs here
    t.add_resource(
        Resource::new("LogBucket", "AWS::S3::Bucket")
            .with_property("BucketName", "LogBucket")
            .with_property("AccessControl", "LogDeliveryWrite")
            .with_tags(managed_tags("Logs")),
    )?;

    t.add_resource(
        Resource::new("StorageBucket", "AWS::S3::Bucket")
            .with_property("BucketName", "StorageBucket")
            .with_property(
                "LoggingConfiguration",
                Properties::new()
                    .with("DestinationBucketName", Expr::reference("LogBucket"))
                    .with("LogFilePrefix", "S3AccessLogs/"),
            )
            .with_tags(managed_tags("Storage")),
    )?;

    t.add_resource(
        Resource::new("LogPolicy", "AWS::S3::BucketPolicy")
            .with_property("Bucket", Expr::reference("LogBucket"))
            .with_property("PolicyDocument", log_bucket_policy()),
    )?;

    t.add_resource(
        Resource::new("CloudTrailLoggingRole", "AWS::IAM::Role")
            .with_property("Path", "/cloudtrail/")
            .with_property(
                "Policies",
                vec![Properties::new()
                    .with("PolicyName", "CloudTrailLogging")
                    .with("PolicyDocument", cloudtrail_role_policy())],
            )
            .with_property(
                "AssumeRolePolicyDocument",
                PolicyDocument::unversioned().statement(
                    Statement::allow()
                        .action(vec!["sts:AssumeRole"])
                        .principal(Principal::service(CLOUDTRAIL_SERVICE)),
                ),
            ),
    )?;

    t.add_resource(Resource::new("CloudTrailLogs", "AWS::Logs::LogGroup"))?;

    // The bucket policy must exist before CloudTrail checks the bucket ACL
    t.add_resource(
        Resource::new("CloudTrail", "AWS::CloudTrail::Trail")
            .depends_on(["LogPolicy"])
            .with_property(
                "CloudWatchLogsLogGroupArn",
                Expr::get_att("CloudTrailLogs", "Arn"),
            )
            .with_property(
                "CloudWatchLogsRoleArn",
                Expr::get_att("CloudTrailLoggingRole", "Arn"),
            )
            .with_property("EnableLogFileValidation", true)
            .with_property("IncludeGlobalServiceEvents", true)
            .with_property("IsLogging", true)
            .with_property("IsMultiRegionTrail", true)
            .with_property("KMSKeyId", Expr::reference("MasterKey"))
            .with_property("S3BucketName", Expr::reference("LogBucket")),
    )?;

    t.add_resource(
        Resource::new("MasterKey", "AWS::KMS::Key")
            .with_property("Description", "Master Key for this Account")
            .with_property("Enabled", true)
            .with_property("EnableKeyRotation", true)
            .with_property("KeyPolicy", master_key_policy()),
    )?;

    t.add_output(
        Output::new("LogBucket", Expr::reference("LogBucket"))
            .with_description("Bucket for logs CloudTrail and ELB logs"),
    )?;
    t.add_output(
        Output::new("StorageBucket", Expr::reference("StorageBucket"))
            .with_description("Bucket for applications to store data"),
    )?;
    t.add_output(
        Output::new("MasterKey", Expr::reference("MasterKey"))
            .with_description("KMS Key to encrypt CloudTrail logs"),
    )?;

    info!("Built account template");
    Ok(t)
}
